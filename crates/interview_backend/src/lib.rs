//! Backend-agnostic contract the interview gateway drives.
//!
//! This crate defines only the three backend operations and the identity of a
//! backend implementation. Transport details live in `interview_api`; session
//! and transcript semantics live in `interview_gateway`.

use async_trait::async_trait;

pub use interview_api::{
    AnswerData, AnswerRequest, ApiError, CancelSignal, ErrorKind, StartChatData,
    StartChatRequest, TestRecord,
};

/// Immutable metadata describing a backend implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub backend_id: String,
    /// Where requests go, for display and logs.
    pub endpoint: String,
}

/// One interview backend.
///
/// Every method performs at most one outbound call and resolves within the
/// implementation's deadline. Raising `cancel` aborts the call with
/// [`ApiError::Cancelled`]. Implementations never retry.
#[async_trait]
pub trait InterviewBackend: Send + Sync + 'static {
    /// Returns backend identity metadata.
    fn profile(&self) -> BackendProfile;

    /// Resolves an activation code to its test record.
    async fn lookup_test(
        &self,
        activation_code: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<TestRecord, ApiError>;

    /// Opens (or resumes) an interview session.
    async fn start_chat(
        &self,
        request: &StartChatRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<StartChatData, ApiError>;

    /// Submits the answer for the active question.
    async fn submit_answer(
        &self,
        request: &AnswerRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<AnswerData, ApiError>;
}
