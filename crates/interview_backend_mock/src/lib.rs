//! Deterministic scripted implementation of the `interview_backend` contract.
//!
//! This crate contains no transport logic and is intended for local offline
//! runs and gateway-level integration testing. Responses are queued per
//! operation and consumed in order; every call is recorded.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use interview_backend::{
    AnswerData, AnswerRequest, ApiError, BackendProfile, CancelSignal, InterviewBackend,
    StartChatData, StartChatRequest, TestRecord,
};
use interview_api::QaPair;
use tokio::time::Instant;

/// Stable backend identifier used for explicit startup selection.
pub const MOCK_BACKEND_ID: &str = "mock";

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One observed backend call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    LookupTest { activation_code: String },
    StartChat(StartChatRequest),
    SubmitAnswer(AnswerRequest),
}

/// Scripted backend used by gateway tests and offline demo runs.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    lookups: Mutex<VecDeque<Result<TestRecord, ApiError>>>,
    starts: Mutex<VecDeque<Result<StartChatData, ApiError>>>,
    answers: Mutex<VecDeque<Result<AnswerData, ApiError>>>,
    calls: Mutex<Vec<BackendCall>>,
    delay: Duration,
    replays_demo: bool,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call by `delay`, honouring cancellation while waiting.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_lookup(self, result: Result<TestRecord, ApiError>) -> Self {
        self.push_lookup(result);
        self
    }

    #[must_use]
    pub fn with_start(self, result: Result<StartChatData, ApiError>) -> Self {
        self.push_start(result);
        self
    }

    #[must_use]
    pub fn with_answer(self, result: Result<AnswerData, ApiError>) -> Self {
        self.push_answer(result);
        self
    }

    pub fn push_lookup(&self, result: Result<TestRecord, ApiError>) {
        lock_unpoisoned(&self.lookups).push_back(result);
    }

    pub fn push_start(&self, result: Result<StartChatData, ApiError>) {
        lock_unpoisoned(&self.starts).push_back(result);
    }

    pub fn push_answer(&self, result: Result<AnswerData, ApiError>) {
        lock_unpoisoned(&self.answers).push_back(result);
    }

    /// Every call observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        lock_unpoisoned(&self.calls).clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        lock_unpoisoned(&self.calls).len()
    }

    /// A short front-end interview that concludes after three answers.
    ///
    /// Every start replays the script from the first question, so a host can
    /// restart against the same backend.
    #[must_use]
    pub fn demo() -> Self {
        let backend = Self {
            replays_demo: true,
            ..Self::new()
        };
        backend.seed_demo();
        backend
    }

    fn seed_demo(&self) {
        let mut starts = lock_unpoisoned(&self.starts);
        starts.clear();
        starts.push_back(Ok(start_data(
            "Welcome! Let's begin. What happens between typing a URL and seeing the page?",
            "demo-q1",
        )));
        let mut answers = lock_unpoisoned(&self.answers);
        answers.clear();
        answers.extend([
            Ok(answer_data(
                "Good overview. How does React decide which components to re-render?",
                "demo-q2",
            )),
            Ok(answer_data(
                "Thanks. Explain the difference between `let`, `const` and `var`.",
                "demo-q3",
            )),
            Ok(AnswerData {
                is_over: true,
                ..answer_data(
                    "That concludes the interview. Thank you for your time!",
                    "demo-end",
                )
            }),
        ]);
    }

    fn record(&self, call: BackendCall) {
        lock_unpoisoned(&self.calls).push(call);
    }

    async fn pause(&self, cancel: Option<&CancelSignal>) -> Result<(), ApiError> {
        let until = Instant::now() + self.delay;
        loop {
            if cancel.is_some_and(|signal| signal.load(Ordering::Acquire)) {
                return Err(ApiError::Cancelled);
            }
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            tokio::time::sleep((until - now).min(CANCEL_POLL_INTERVAL)).await;
        }
    }
}

fn next_scripted<T>(
    queue: &Mutex<VecDeque<Result<T, ApiError>>>,
    operation: &str,
) -> Result<T, ApiError> {
    lock_unpoisoned(queue).pop_front().unwrap_or_else(|| {
        Err(ApiError::Transport(format!(
            "mock backend has no scripted {operation} response"
        )))
    })
}

#[async_trait]
impl InterviewBackend for ScriptedBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            backend_id: MOCK_BACKEND_ID.to_string(),
            endpoint: "memory://scripted".to_string(),
        }
    }

    async fn lookup_test(
        &self,
        activation_code: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<TestRecord, ApiError> {
        self.record(BackendCall::LookupTest {
            activation_code: activation_code.to_string(),
        });
        self.pause(cancel).await?;
        next_scripted(&self.lookups, "lookup")
    }

    async fn start_chat(
        &self,
        request: &StartChatRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<StartChatData, ApiError> {
        self.record(BackendCall::StartChat(request.clone()));
        self.pause(cancel).await?;
        if self.replays_demo {
            self.seed_demo();
        }
        next_scripted(&self.starts, "start")
    }

    async fn submit_answer(
        &self,
        request: &AnswerRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<AnswerData, ApiError> {
        self.record(BackendCall::SubmitAnswer(request.clone()));
        self.pause(cancel).await?;
        next_scripted(&self.answers, "answer")
    }
}

/// Successful `/chat/start` payload with no history.
#[must_use]
pub fn start_data(feedback: &str, question_id: &str) -> StartChatData {
    StartChatData {
        feedback: feedback.to_string(),
        kind: "question".to_string(),
        question_id: question_id.to_string(),
        qa_history: None,
        is_over: false,
    }
}

/// Successful `/chat/start` payload resuming after `history`.
#[must_use]
pub fn resumed_start_data(
    feedback: &str,
    question_id: &str,
    history: &[(&str, &str)],
) -> StartChatData {
    StartChatData {
        qa_history: Some(
            history
                .iter()
                .map(|(question, answer)| QaPair {
                    question: (*question).to_string(),
                    answer: (*answer).to_string(),
                })
                .collect(),
        ),
        ..start_data(feedback, question_id)
    }
}

/// Successful `/chat/answer` payload.
#[must_use]
pub fn answer_data(feedback: &str, question_id: &str) -> AnswerData {
    AnswerData {
        feedback: feedback.to_string(),
        kind: "question".to_string(),
        question_id: question_id.to_string(),
        is_over: false,
    }
}

/// A pending test record as the activation-code lookup returns it.
#[must_use]
pub fn test_record(test_id: &str, status: &str) -> TestRecord {
    TestRecord {
        test_id: test_id.to_string(),
        activate_code: Some("MOCK-CODE".to_string()),
        kind: Some("interview".to_string()),
        language: "English".to_string(),
        difficulty: "medium".to_string(),
        status: status.to_string(),
        job_id: Some("job-1".to_string()),
        job_title: "Backend engineer".to_string(),
        user_id: "user-42".to_string(),
        user_name: Some("Candidate".to_string()),
        question_ids: vec!["q1".to_string(), "q2".to_string()],
        examination_points: vec!["Rust".to_string(), "Databases".to_string()],
        test_time: 30,
        create_date: None,
        start_date: None,
        expire_date: None,
        update_date: None,
    }
}

/// Business rejection with the given backend message.
#[must_use]
pub fn business_error(code: &str, message: &str) -> ApiError {
    ApiError::Business {
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
