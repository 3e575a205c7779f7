use std::time::Duration;

use reqwest::StatusCode;

use interview_api::error::{parse_error_message, GENERIC_FAILURE_MESSAGE};
use interview_api::{ApiError, ErrorKind};

#[test]
fn parse_error_message_uses_structured_message() {
    let body = r#"{"code":"404","message":"test not found"}"#;
    assert_eq!(parse_error_message(StatusCode::NOT_FOUND, body), "test not found");
}

#[test]
fn parse_error_message_accepts_detail_field() {
    let body = r#"{"detail":"Not authenticated"}"#;
    assert_eq!(
        parse_error_message(StatusCode::UNAUTHORIZED, body),
        "Not authenticated"
    );
}

#[test]
fn malformed_error_body_falls_back_to_status_reason() {
    let body = "<html>502 upstream</html>";
    assert_eq!(parse_error_message(StatusCode::BAD_GATEWAY, body), "Bad Gateway");
}

#[test]
fn unknown_status_without_message_uses_generic_text() {
    let status = StatusCode::from_u16(599).expect("valid status code");
    assert_eq!(parse_error_message(status, ""), GENERIC_FAILURE_MESSAGE);
}

#[test]
fn kinds_are_mutually_exclusive_classes() {
    assert_eq!(ApiError::Timeout(Duration::from_secs(1)).kind(), ErrorKind::Timeout);
    assert_eq!(ApiError::Cancelled.kind(), ErrorKind::Cancelled);
    assert_eq!(
        ApiError::Business {
            code: "1".to_owned(),
            message: "nope".to_owned()
        }
        .kind(),
        ErrorKind::Business
    );
    assert_eq!(
        ApiError::Http {
            status: 500,
            message: "boom".to_owned()
        }
        .kind(),
        ErrorKind::Transport
    );
    assert_eq!(
        ApiError::Transport("reset".to_owned()).kind(),
        ErrorKind::Transport
    );
}

#[test]
fn timeout_display_reports_deadline() {
    let error = ApiError::Timeout(Duration::from_millis(120_000));
    assert_eq!(error.to_string(), "request timed out after 120000 ms");
}
