//! Session gateway for a remote interview question/answer backend.
//!
//! The backend is stateless per call and slow (it generates text). This crate
//! turns it into a continuous, resumable conversation: it bootstraps a session
//! from an activation code or from defaults, rebuilds the transcript of a
//! resumed session, and advances one turn per candidate answer. Every failure
//! surfaces as a [`GatewayError`] whose [`ErrorKind`] callers branch on and
//! whose [`GatewayError::user_message`] is safe to display.
//!
//! Transport lives in `interview_api`; the backend contract in
//! `interview_backend`.
//!
//! # Environment
//! Hosts read configuration once with [`EnvConfig::from_env`]:
//! - `INTERVIEW_API_BASE_URL`: backend base URL.
//! - `INTERVIEW_API_TOKEN`: bearer token.
//! - `INTERVIEW_API_TIMEOUT_MS`: per-call deadline.
//! - `INTERVIEW_BACKEND`: `http` or `mock`.
//! - `INTERVIEW_LOG`: tracing filter, overrides `RUST_LOG`.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http_backend;
pub mod logging;
pub mod session;
pub mod transcript;
pub mod turn;

pub use bootstrap::DefaultSessionProfile;
pub use config::{BackendKind, EnvConfig, GatewayConfig};
pub use error::{BackendOperation, BusinessReason, ErrorKind, GatewayError};
pub use gateway::InterviewGateway;
pub use http_backend::HttpBackend;
pub use logging::init_tracing;
pub use session::{Interview, Session, SessionState};
pub use transcript::{reconstruct, Message, MessageId, Role, Transcript};

pub use interview_api::CancelSignal;
pub use interview_backend::{BackendProfile, InterviewBackend};
