//! Transport-only client primitives for the interview backend.
//!
//! This crate owns request building, the timeout-bounded call, and response
//! envelope normalization for the three backend endpoints. It contains no
//! session or transcript logic; `interview_gateway` layers those on top.
//!
//! Every call resolves to exactly one of: success with a decoded payload,
//! a business rejection (`code != "0"`), a transport failure, a timeout, or a
//! caller-initiated cancellation. See [`ApiError::kind`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::{CallScope, CancelSignal, InterviewApiClient, RawResponse};
pub use config::ApiConfig;
pub use envelope::{normalize, normalize_envelope_first, Envelope, SUCCESS_CODE};
pub use error::{ApiError, ErrorKind};
pub use payload::{
    AnswerData, AnswerRequest, QaPair, StartChatData, StartChatRequest, TestRecord,
};
pub use url::{endpoint_url, Endpoint, DEFAULT_BASE_URL};
