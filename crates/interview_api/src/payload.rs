use serde::{Deserialize, Serialize};

/// Body of `POST /chat/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatRequest {
    pub user_id: String,
    pub test_id: String,
    pub job_title: String,
    /// Examination points joined into one string.
    pub examination_points: String,
    /// Allotted time, in the backend's units.
    pub test_time: u32,
    pub language: String,
    pub difficulty: String,
}

/// One answered turn as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// `data` of a successful `POST /chat/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatData {
    /// Opening prompt, or the still-open question when resuming.
    pub feedback: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_history: Option<Vec<QaPair>>,
    #[serde(default)]
    pub is_over: bool,
}

impl StartChatData {
    /// Answered turns in order; empty for a fresh session.
    pub fn history(&self) -> &[QaPair] {
        self.qa_history.as_deref().unwrap_or(&[])
    }
}

/// Body of `POST /chat/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub user_id: String,
    pub test_id: String,
    pub question_id: String,
    pub user_answer: String,
}

/// `data` of a successful `POST /chat/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerData {
    /// Next prompt shown to the candidate.
    pub feedback: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub question_id: String,
    /// Absent on older backends; treated as `false`.
    #[serde(default)]
    pub is_over: bool,
}

/// Pre-provisioned interview looked up by activation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test_id: String,
    #[serde(default)]
    pub activate_code: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub language: String,
    pub difficulty: String,
    pub status: String,
    #[serde(default)]
    pub job_id: Option<String>,
    pub job_title: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub examination_points: Vec<String>,
    pub test_time: u32,
    #[serde(default)]
    pub create_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub expire_date: Option<String>,
    #[serde(default)]
    pub update_date: Option<String>,
}

impl TestRecord {
    /// Status value the backend uses for a finished test.
    pub const STATUS_COMPLETED: &'static str = "completed";

    pub fn is_completed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(Self::STATUS_COMPLETED)
    }

    /// Examination points in the single-string form `/chat/start` expects.
    pub fn joined_examination_points(&self) -> String {
        self.examination_points
            .iter()
            .map(|point| point.trim())
            .filter(|point| !point.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
