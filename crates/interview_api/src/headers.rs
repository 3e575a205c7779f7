use std::collections::BTreeMap;

use crate::config::ApiConfig;
use crate::error::ApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Build a deterministic header map for backend requests.
///
/// `with_body` adds `content-type` for POST requests. Extra headers are applied
/// last, lower-cased, and may override the defaults except `authorization`.
pub fn build_headers(
    config: &ApiConfig,
    with_body: bool,
) -> Result<BTreeMap<String, String>, ApiError> {
    let token = config.access_token.trim();
    if token.is_empty() {
        return Err(ApiError::MissingAccessToken);
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_ACCEPT.to_owned(), JSON_MEDIA_TYPE.to_owned());
    if with_body {
        headers.insert(HEADER_CONTENT_TYPE.to_owned(), JSON_MEDIA_TYPE.to_owned());
    }

    let user_agent = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), user_agent);

    for (key, value) in &config.extra_headers {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ApiError::InvalidHeader("empty header name".to_owned()));
        }
        headers.insert(key, value.trim().to_owned());
    }

    headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));

    Ok(headers)
}

fn default_user_agent() -> String {
    format!(
        "interview-gateway/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
