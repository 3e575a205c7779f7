use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use interview_api::ApiError;
use regex::Regex;
use thiserror::Error;

pub const TIMEOUT_USER_MESSAGE: &str =
    "This is taking longer than usual. Please try again in a moment.";
pub const RETRY_USER_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";
pub const TEST_NOT_FOUND_USER_MESSAGE: &str =
    "No interview was found for this activation code. Please check the code and try again.";
pub const TEST_COMPLETED_USER_MESSAGE: &str = "This interview has already been completed.";
pub const SESSION_CONCLUDED_USER_MESSAGE: &str = "This interview session has already concluded.";

/// Coarse failure class for programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    Transport,
    Business,
    Cancelled,
    PreconditionViolation,
}

/// Domain meaning of a business rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessReason {
    TestNotFound,
    TestCompleted,
    SessionConcluded,
    Rejected,
}

impl BusinessReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TestNotFound => "test not found",
            Self::TestCompleted => "test already completed",
            Self::SessionConcluded => "session already concluded",
            Self::Rejected => "request rejected",
        }
    }
}

impl fmt::Display for BusinessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend did not respond within {} ms", .deadline.as_millis())]
    Timeout { deadline: Duration },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("call cancelled by host")]
    Cancelled,

    #[error("{reason}: {message}")]
    Business {
        reason: BusinessReason,
        message: String,
    },

    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl GatewayError {
    #[must_use]
    pub fn business(reason: BusinessReason, message: impl Into<String>) -> Self {
        Self::Business {
            reason,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Business { .. } => ErrorKind::Business,
            Self::Precondition(_) => ErrorKind::PreconditionViolation,
        }
    }

    #[must_use]
    pub fn business_reason(&self) -> Option<BusinessReason> {
        match self {
            Self::Business { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Text safe to show the candidate.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => TIMEOUT_USER_MESSAGE,
            Self::Business {
                reason: BusinessReason::TestNotFound,
                ..
            } => TEST_NOT_FOUND_USER_MESSAGE,
            Self::Business {
                reason: BusinessReason::TestCompleted,
                ..
            } => TEST_COMPLETED_USER_MESSAGE,
            Self::Business {
                reason: BusinessReason::SessionConcluded,
                ..
            } => SESSION_CONCLUDED_USER_MESSAGE,
            _ => RETRY_USER_MESSAGE,
        }
    }
}

/// Backend operation a failure came from; business messages are only
/// interpreted in the context of the call that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOperation {
    LookupTest,
    StartChat,
    SubmitAnswer,
}

impl GatewayError {
    /// Converts a backend failure, translating business messages through
    /// [`BUSINESS_MESSAGE_RULES`] for `operation`.
    #[must_use]
    pub fn from_backend(operation: BackendOperation, error: ApiError) -> Self {
        match error {
            ApiError::Business { message, .. } => {
                Self::business(classify_business_message(operation, &message), message)
            }
            other => Self::from(other),
        }
    }
}

/// Business rejections keep their text but no domain reason.
impl From<ApiError> for GatewayError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Timeout(deadline) => Self::Timeout { deadline },
            ApiError::Cancelled => Self::Cancelled,
            ApiError::Business { message, .. } => {
                Self::business(BusinessReason::Rejected, message)
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

/// One message pattern, the operations it applies to, and its reason.
#[derive(Debug, Clone, Copy)]
pub struct BusinessMessageRule {
    pub operations: &'static [BackendOperation],
    pub reason: BusinessReason,
    pub pattern: &'static str,
}

/// Backend message patterns and the reason each maps to, first match wins.
///
/// The backend only reports these conditions as free text, in English or
/// Chinese, so this table is the single place that depends on its wording.
/// Test-level reasons apply to lookup and start only; an answer rejection
/// only gains a reason when it says the interview itself is over.
pub const BUSINESS_MESSAGE_RULES: &[BusinessMessageRule] = &[
    BusinessMessageRule {
        operations: &[BackendOperation::LookupTest, BackendOperation::StartChat],
        reason: BusinessReason::TestCompleted,
        pattern: r"(?i)(test|interview)\s+(has\s+)?already\s+(been\s+)?(completed|finished)|already\s+(been\s+)?completed|(测试|面试)已完成",
    },
    BusinessMessageRule {
        operations: &[
            BackendOperation::LookupTest,
            BackendOperation::StartChat,
            BackendOperation::SubmitAnswer,
        ],
        reason: BusinessReason::SessionConcluded,
        pattern: r"(?i)(interview|session)\s+(is\s+|has\s+)?(over|ended|concluded)|面试已结束",
    },
    BusinessMessageRule {
        operations: &[BackendOperation::LookupTest, BackendOperation::StartChat],
        reason: BusinessReason::TestNotFound,
        pattern: r"(?i)(test|activation\s+code|code)\s+(was\s+)?not\s+found|does\s+not\s+exist|no\s+such\s+test|invalid\s+activation\s+code|(测试|激活码)不存在|激活码无效",
    },
];

fn compiled_rules() -> &'static [(BusinessMessageRule, Regex)] {
    static CACHED: OnceLock<Vec<(BusinessMessageRule, Regex)>> = OnceLock::new();
    CACHED.get_or_init(|| {
        BUSINESS_MESSAGE_RULES
            .iter()
            .map(|rule| {
                (
                    *rule,
                    Regex::new(rule.pattern).expect("business message rule must compile"),
                )
            })
            .collect()
    })
}

/// Translate a backend business message from `operation` into a domain reason.
pub fn classify_business_message(operation: BackendOperation, message: &str) -> BusinessReason {
    compiled_rules()
        .iter()
        .filter(|(rule, _)| rule.operations.contains(&operation))
        .find(|(_, pattern)| pattern.is_match(message))
        .map(|(rule, _)| rule.reason)
        .unwrap_or(BusinessReason::Rejected)
}
