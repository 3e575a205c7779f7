//! Linear conversation transcript.
//!
//! Messages are append-only: insertion order is chronological order is display
//! order. Identities come from a counter scoped to the transcript, so two
//! messages created in the same millisecond still differ.

use std::fmt;

use interview_api::QaPair;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Interviewer,
    Candidate,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interviewer => "interviewer",
            Self::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<role>-<turn>-<seq>`; `seq` is unique within the owning transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId {
    pub role: Role,
    pub turn: usize,
    pub seq: u64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.role, self.turn, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    content: String,
    created_at: OffsetDateTime,
}

impl Message {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.id.role
    }

    pub fn turn(&self) -> usize {
        self.id.turn
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn created_at_rfc3339(&self) -> Result<String, time::error::Format> {
        self.created_at.format(&Rfc3339)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
    next_seq: u64,
    questions_asked: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Turn index of the most recent interviewer message.
    pub fn current_turn(&self) -> usize {
        self.questions_asked.saturating_sub(1)
    }

    pub(crate) fn push_interviewer(&mut self, content: impl Into<String>) -> &Message {
        let turn = self.questions_asked;
        self.questions_asked += 1;
        self.push(Role::Interviewer, turn, content.into())
    }

    pub(crate) fn push_candidate(&mut self, content: impl Into<String>) -> &Message {
        let turn = self.current_turn();
        self.push(Role::Candidate, turn, content.into())
    }

    fn push(&mut self, role: Role, turn: usize, content: String) -> &Message {
        let id = MessageId {
            role,
            turn,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let index = self.messages.len();
        self.messages.push(Message {
            id,
            content,
            created_at: OffsetDateTime::now_utc(),
        });
        &self.messages[index]
    }
}

/// Rebuilds the conversation a resumed session has already had.
///
/// Each history pair becomes an interviewer then a candidate message, followed
/// by one interviewer message carrying `open_prompt`.
pub fn reconstruct(history: &[QaPair], open_prompt: &str) -> Transcript {
    let mut transcript = Transcript::new();
    for pair in history {
        transcript.push_interviewer(pair.question.as_str());
        transcript.push_candidate(pair.answer.as_str());
    }
    transcript.push_interviewer(open_prompt);
    transcript
}
