use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Fallback used when neither the error body nor the status carries a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access token is required")]
    MissingAccessToken,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request was cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    #[error("backend rejected request (code {code}): {message}")]
    Business { code: String, message: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    Transport,
    Business,
    Cancelled,
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Business { .. } => ErrorKind::Business,
            Self::MissingAccessToken
            | Self::InvalidBaseUrl(_)
            | Self::InvalidHeader(_)
            | Self::Transport(_)
            | Self::Http { .. }
            | Self::MalformedEnvelope(_)
            | Self::Serde(_) => ErrorKind::Transport,
        }
    }

    /// Backend-supplied message for business rejections.
    #[must_use]
    pub fn business_message(&self) -> Option<&str> {
        match self {
            Self::Business { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Extract a human-readable message from a non-success response body.
///
/// A body that does not decode never replaces the failure itself: the status'
/// canonical reason is used instead, then [`GENERIC_FAILURE_MESSAGE`].
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let explicit = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.detail))
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty());

    explicit.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    })
}
