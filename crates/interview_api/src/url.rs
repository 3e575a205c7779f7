use reqwest::{Method, Url};

use crate::error::ApiError;

/// Default base URL for the interview backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// One of the three backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    StartChat,
    Answer,
    ActivateCode(String),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::StartChat | Self::Answer => Method::POST,
            Self::ActivateCode(_) => Method::GET,
        }
    }

    /// Short stable name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartChat => "chat/start",
            Self::Answer => "chat/answer",
            Self::ActivateCode(_) => "test/activate_code",
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Self::StartChat => vec!["chat", "start"],
            Self::Answer => vec!["chat", "answer"],
            Self::ActivateCode(code) => vec!["test", "activate_code", code.as_str()],
        }
    }
}

/// Resolve an endpoint against a base URL.
///
/// Rules:
/// 1) blank base falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes on the base are ignored
/// 3) each endpoint segment is percent-encoded, so an activation code can never
///    escape its path segment
pub fn endpoint_url(base: &str, endpoint: &Endpoint) -> Result<Url, ApiError> {
    let base = if base.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        base.trim().trim_end_matches('/')
    };

    let mut url =
        Url::parse(base).map_err(|error| ApiError::InvalidBaseUrl(format!("{base}: {error}")))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{base}: cannot be a base")))?;
        segments.pop_if_empty();
        segments.extend(endpoint.segments());
    }
    Ok(url)
}
