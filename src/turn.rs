//! Turn advancement: one candidate answer in, one interviewer message out.

use interview_api::{AnswerRequest, CancelSignal};
use interview_backend::InterviewBackend;

use crate::error::{BackendOperation, GatewayError};
use crate::logging::preview;
use crate::session::{Interview, SessionState};
use crate::transcript::Message;

/// Submits `answer` for the active question.
///
/// Blank answers and sessions that are not `Ready` are rejected before any
/// backend call. On failure the interview is left untouched so the caller can
/// resubmit.
pub async fn submit_answer(
    backend: &dyn InterviewBackend,
    interview: &mut Interview,
    answer: &str,
    cancel: Option<&CancelSignal>,
) -> Result<Message, GatewayError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(GatewayError::precondition("answer is empty"));
    }
    let state = interview.session.state();
    if state != SessionState::Ready {
        return Err(GatewayError::precondition(format!(
            "session is {state}; answers are only accepted while ready"
        )));
    }

    let request = AnswerRequest {
        user_id: interview.session.user_id().to_string(),
        test_id: interview.session.test_id().to_string(),
        question_id: interview.session.question_id().to_string(),
        user_answer: answer.to_string(),
    };
    tracing::info!(
        test_id = %request.test_id,
        question_id = %request.question_id,
        "submitting answer"
    );
    tracing::debug!(answer = %preview(answer), "answer text");

    let data = backend
        .submit_answer(&request, cancel)
        .await
        .map_err(|error| GatewayError::from_backend(BackendOperation::SubmitAnswer, error))
        .inspect_err(|error| {
            tracing::warn!(test_id = %request.test_id, %error, "answer rejected");
        })?;

    interview.session.advance(data.question_id.as_str(), data.is_over)?;
    interview.transcript.push_candidate(answer);
    let message = interview.transcript.push_interviewer(data.feedback).clone();

    tracing::info!(
        test_id = %request.test_id,
        question_id = %data.question_id,
        concluded = data.is_over,
        "turn advanced"
    );
    Ok(message)
}
