//! Terminal host for the interview gateway.
//!
//! ## Backend selection
//!
//! `INTERVIEW_BACKEND` picks the backend explicitly:
//!
//! - `http` (default) talks to `INTERVIEW_API_BASE_URL` with
//!   `INTERVIEW_API_TOKEN`, bounded by `INTERVIEW_API_TIMEOUT_MS`.
//! - `mock` runs a short scripted interview offline.
//!
//! ## Usage
//!
//! `interview_cli [ACTIVATION_CODE]`. Without a code the session starts from
//! the default profile. Ctrl-C while waiting on the backend cancels that call;
//! Ctrl-C at the prompt exits.

pub mod app;
pub mod backends;
pub mod commands;
