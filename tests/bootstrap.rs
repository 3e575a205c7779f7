use std::sync::Arc;

use interview_backend_mock::{
    business_error, resumed_start_data, start_data, test_record, BackendCall, ScriptedBackend,
};
use interview_gateway::{
    error::TEST_COMPLETED_USER_MESSAGE, BusinessReason, DefaultSessionProfile, ErrorKind,
    InterviewGateway, Role, SessionState,
};
use pretty_assertions::assert_eq;

fn gateway(backend: &Arc<ScriptedBackend>) -> InterviewGateway {
    InterviewGateway::new(backend.clone())
}

#[tokio::test]
async fn no_code_uses_defaults_and_opens_with_backend_prompt() {
    let backend = Arc::new(ScriptedBackend::new().with_start(Ok(start_data(
        "Hi! Tell me about yourself.",
        "q1",
    ))));

    let interview = gateway(&backend)
        .start_session(None, None)
        .await
        .expect("default bootstrap");

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let BackendCall::StartChat(request) = &calls[0] else {
        panic!("expected start call, got {calls:?}");
    };
    assert_eq!(request.job_title, "front-end engineer (default)");
    assert_eq!(request.test_time, 3);
    assert!(request.user_id.starts_with("user_"));
    assert!(request.test_id.starts_with("test_"));
    assert_eq!(
        request.user_id.trim_start_matches("user_"),
        request.test_id.trim_start_matches("test_")
    );

    let session = interview.session();
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.question_id(), "q1");
    assert_eq!(session.test_id(), request.test_id);
    assert_eq!(session.job_title(), "front-end engineer (default)");

    let messages = interview.transcript().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role(), Role::Interviewer);
    assert_eq!(messages[0].content(), "Hi! Tell me about yourself.");
}

#[tokio::test]
async fn custom_defaults_flow_into_start_request() {
    let backend = Arc::new(ScriptedBackend::new().with_start(Ok(start_data("Hello", "q1"))));
    let defaults = DefaultSessionProfile {
        job_title: "data engineer".to_string(),
        language: "English".to_string(),
        ..DefaultSessionProfile::default()
    };

    gateway(&backend)
        .with_defaults(defaults)
        .start_session(None, None)
        .await
        .expect("bootstrap");

    let BackendCall::StartChat(request) = &backend.calls()[0] else {
        panic!("expected start call");
    };
    assert_eq!(request.job_title, "data engineer");
    assert_eq!(request.language, "English");
}

#[tokio::test]
async fn activation_code_builds_request_from_test_record() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_lookup(Ok(test_record("test-7", "pending")))
            .with_start(Ok(start_data("Welcome back.", "q1"))),
    );

    let interview = gateway(&backend)
        .start_session(Some("  CODE-1 "), None)
        .await
        .expect("code bootstrap");

    let calls = backend.calls();
    assert_eq!(
        calls[0],
        BackendCall::LookupTest {
            activation_code: "CODE-1".to_string()
        }
    );
    let BackendCall::StartChat(request) = &calls[1] else {
        panic!("expected start call");
    };
    assert_eq!(request.user_id, "user-42");
    assert_eq!(request.test_id, "test-7");
    assert_eq!(request.job_title, "Backend engineer");
    assert_eq!(request.examination_points, "Rust, Databases");
    assert_eq!(request.test_time, 30);
    assert_eq!(request.language, "English");
    assert_eq!(request.difficulty, "medium");

    assert_eq!(interview.session().user_id(), "user-42");
    assert_eq!(interview.session().test_id(), "test-7");
}

#[tokio::test]
async fn completed_record_ends_bootstrap_before_start() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_lookup(Ok(test_record("test-9", "completed")))
            .with_start(Ok(start_data("never", "q1"))),
    );

    let error = gateway(&backend)
        .start_session(Some("DONE"), None)
        .await
        .expect_err("completed test");

    assert_eq!(error.kind(), ErrorKind::Business);
    assert_eq!(error.business_reason(), Some(BusinessReason::TestCompleted));
    assert_eq!(error.user_message(), TEST_COMPLETED_USER_MESSAGE);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn lookup_rejection_is_translated_through_message_table() {
    let backend = Arc::new(
        ScriptedBackend::new().with_lookup(Err(business_error("404", "激活码不存在"))),
    );

    let error = gateway(&backend)
        .start_session(Some("NOPE"), None)
        .await
        .expect_err("unknown code");

    assert_eq!(error.business_reason(), Some(BusinessReason::TestNotFound));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn blank_code_is_rejected_locally() {
    let backend = Arc::new(ScriptedBackend::new());

    let error = gateway(&backend)
        .start_session(Some("   "), None)
        .await
        .expect_err("blank code");

    assert_eq!(error.kind(), ErrorKind::PreconditionViolation);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn concluded_start_yields_no_session() {
    let mut over = start_data("Thanks, we are done.", "q-end");
    over.is_over = true;
    let backend = Arc::new(ScriptedBackend::new().with_start(Ok(over)));

    let error = gateway(&backend)
        .start_session(None, None)
        .await
        .expect_err("already over");

    assert_eq!(
        error.business_reason(),
        Some(BusinessReason::SessionConcluded)
    );
}

#[tokio::test]
async fn resumed_session_rebuilds_history_before_next_question() {
    let backend = Arc::new(ScriptedBackend::new().with_start(Ok(resumed_start_data(
        "Q3: what is a closure?",
        "q3",
        &[("Q1: what is JSX?", "A1"), ("Q2: what is a hook?", "A2")],
    ))));

    let interview = gateway(&backend)
        .start_session(None, None)
        .await
        .expect("resume");

    let rendered: Vec<(Role, &str)> = interview
        .transcript()
        .messages()
        .iter()
        .map(|message| (message.role(), message.content()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            (Role::Interviewer, "Q1: what is JSX?"),
            (Role::Candidate, "A1"),
            (Role::Interviewer, "Q2: what is a hook?"),
            (Role::Candidate, "A2"),
            (Role::Interviewer, "Q3: what is a closure?"),
        ]
    );
    assert_eq!(interview.session().question_id(), "q3");
}

#[tokio::test]
async fn start_transport_failure_is_not_retried() {
    let backend = Arc::new(ScriptedBackend::new());

    let error = gateway(&backend)
        .start_session(None, None)
        .await
        .expect_err("no scripted start");

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert_eq!(backend.call_count(), 1);
}
