//! Response normalization shared by every endpoint.
//!
//! Wire envelope: `{"code": "0", "message": "...", "data": ...}`. Only the JSON
//! *string* `"0"` is success; a numeric `0` is treated as any other code.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::RawResponse;
use crate::error::{parse_error_message, ApiError};

pub const SUCCESS_CODE: &str = "0";

const REJECTED_WITHOUT_MESSAGE: &str = "request rejected by backend";

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        matches!(&self.code, Value::String(code) if code == SUCCESS_CODE)
    }

    pub fn code_text(&self) -> String {
        match &self.code {
            Value::String(code) => code.clone(),
            other => other.to_string(),
        }
    }
}

/// Map a raw response onto a decoded payload or a typed failure.
pub fn normalize<T>(raw: &RawResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    if !raw.status.is_success() {
        return Err(ApiError::Http {
            status: raw.status.as_u16(),
            message: parse_error_message(raw.status, &raw.body),
        });
    }

    let envelope = serde_json::from_str::<Envelope>(&raw.body)
        .map_err(|error| ApiError::MalformedEnvelope(error.to_string()))?;

    if !envelope.is_success() {
        return Err(business_rejection(&envelope));
    }

    if envelope.data.is_null() {
        return Err(ApiError::MalformedEnvelope(
            "success envelope carries no data".to_owned(),
        ));
    }

    serde_json::from_value(envelope.data)
        .map_err(|error| ApiError::MalformedEnvelope(format!("unexpected data shape: {error}")))
}

/// Like [`normalize`], but a non-2xx response whose body is a rejection
/// envelope yields that business failure instead of `Http`.
///
/// The activation-code lookup answers "not found" with a 404 status and a
/// regular envelope; the envelope carries the meaning.
pub fn normalize_envelope_first<T>(raw: &RawResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    if !raw.status.is_success() {
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&raw.body) {
            if !envelope.is_success() {
                return Err(business_rejection(&envelope));
            }
        }
    }
    normalize(raw)
}

fn business_rejection(envelope: &Envelope) -> ApiError {
    let message = envelope
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(REJECTED_WITHOUT_MESSAGE)
        .to_owned();
    ApiError::Business {
        code: envelope.code_text(),
        message,
    }
}
