//! Session bootstrap: resolve what to start, start it, and rebuild history.

use std::time::{SystemTime, UNIX_EPOCH};

use interview_api::{CancelSignal, StartChatRequest, TestRecord};
use interview_backend::InterviewBackend;

use crate::error::{BackendOperation, BusinessReason, GatewayError};
use crate::logging::preview;
use crate::session::{Interview, Session, SessionState};
use crate::transcript::reconstruct;

/// Interview parameters used when no activation code is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSessionProfile {
    pub job_title: String,
    pub examination_points: String,
    pub test_time: u32,
    pub language: String,
    pub difficulty: String,
}

impl Default for DefaultSessionProfile {
    fn default() -> Self {
        Self {
            job_title: "front-end engineer (default)".to_string(),
            examination_points: "React, JavaScript, TypeScript, Web fundamentals".to_string(),
            test_time: 3,
            language: "Chinese".to_string(),
            difficulty: "easy".to_string(),
        }
    }
}

impl DefaultSessionProfile {
    /// Start request with fresh identifiers derived from `now_millis`.
    pub fn start_request(&self, now_millis: u128) -> StartChatRequest {
        StartChatRequest {
            user_id: format!("user_{now_millis}"),
            test_id: format!("test_{now_millis}"),
            job_title: self.job_title.clone(),
            examination_points: self.examination_points.clone(),
            test_time: self.test_time,
            language: self.language.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

pub fn start_request_from_record(record: &TestRecord) -> StartChatRequest {
    StartChatRequest {
        user_id: record.user_id.clone(),
        test_id: record.test_id.clone(),
        job_title: record.job_title.clone(),
        examination_points: record.joined_examination_points(),
        test_time: record.test_time,
        language: record.language.clone(),
        difficulty: record.difficulty.clone(),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

/// Decides which start request to send.
///
/// With a code the test record is fetched first; a record already marked
/// completed ends bootstrap here, before anything is started.
pub async fn resolve_start_request(
    backend: &dyn InterviewBackend,
    activation_code: Option<&str>,
    defaults: &DefaultSessionProfile,
    cancel: Option<&CancelSignal>,
) -> Result<StartChatRequest, GatewayError> {
    let Some(code) = activation_code else {
        let request = defaults.start_request(now_millis());
        tracing::info!(test_id = %request.test_id, "starting interview with default profile");
        return Ok(request);
    };

    let code = code.trim();
    if code.is_empty() {
        return Err(GatewayError::precondition("activation code is blank"));
    }

    let record = backend
        .lookup_test(code, cancel)
        .await
        .map_err(|error| GatewayError::from_backend(BackendOperation::LookupTest, error))?;
    if record.is_completed() {
        tracing::info!(test_id = %record.test_id, "activation code refers to a completed test");
        return Err(GatewayError::business(
            BusinessReason::TestCompleted,
            format!("test {} is already completed", record.test_id),
        ));
    }

    tracing::info!(
        test_id = %record.test_id,
        job_title = %record.job_title,
        status = %record.status,
        "activation code resolved"
    );
    Ok(start_request_from_record(&record))
}

/// Starts (or resumes) an interview and returns it ready for the first answer.
pub async fn bootstrap(
    backend: &dyn InterviewBackend,
    activation_code: Option<&str>,
    defaults: &DefaultSessionProfile,
    cancel: Option<&CancelSignal>,
) -> Result<Interview, GatewayError> {
    let request = resolve_start_request(backend, activation_code, defaults, cancel).await?;
    let mut session = Session::bootstrapping(
        request.user_id.as_str(),
        request.test_id.as_str(),
        request.job_title.as_str(),
    );

    let data = match backend.start_chat(&request, cancel).await {
        Ok(data) => data,
        Err(error) => {
            let error = GatewayError::from_backend(BackendOperation::StartChat, error);
            session.transition(SessionState::Failed)?;
            tracing::warn!(test_id = %request.test_id, %error, "interview start failed");
            return Err(error);
        }
    };

    if data.is_over {
        session.transition(SessionState::Concluded)?;
        tracing::info!(test_id = %request.test_id, "interview already concluded");
        return Err(GatewayError::business(
            BusinessReason::SessionConcluded,
            format!("interview {} has already concluded", request.test_id),
        ));
    }

    session.advance(data.question_id.as_str(), false)?;
    let transcript = reconstruct(data.history(), &data.feedback);
    tracing::info!(
        test_id = %request.test_id,
        question_id = %data.question_id,
        resumed_pairs = data.history().len(),
        "interview ready"
    );
    tracing::debug!(prompt = %preview(&data.feedback), "opening prompt");

    Ok(Interview::new(session, transcript))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_uses_profile_and_time_derived_ids() {
        let request = DefaultSessionProfile::default().start_request(1_700_000_000_123);

        assert_eq!(request.user_id, "user_1700000000123");
        assert_eq!(request.test_id, "test_1700000000123");
        assert_eq!(request.job_title, "front-end engineer (default)");
        assert_eq!(
            request.examination_points,
            "React, JavaScript, TypeScript, Web fundamentals"
        );
        assert_eq!(request.test_time, 3);
        assert_eq!(request.language, "Chinese");
        assert_eq!(request.difficulty, "easy");
    }

    #[test]
    fn overridden_profile_is_honoured() {
        let profile = DefaultSessionProfile {
            job_title: "SRE".to_string(),
            test_time: 10,
            ..DefaultSessionProfile::default()
        };
        let request = profile.start_request(5);
        assert_eq!(request.job_title, "SRE");
        assert_eq!(request.test_time, 10);
    }
}
