//! Server-assigned interview session and its lifecycle.

use std::fmt;

use crate::error::GatewayError;
use crate::transcript::Transcript;

/// Lifecycle of one session.
///
/// `Bootstrapping` moves to `Ready`, `Concluded` or `Failed`. `Ready` loops on
/// itself for every accepted answer and ends in `Concluded`. `Concluded` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Bootstrapping,
    Ready,
    Concluded,
    Failed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrapping => "bootstrapping",
            Self::Ready => "ready",
            Self::Concluded => "concluded",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Concluded | Self::Failed)
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Bootstrapping, Self::Ready)
                | (Self::Bootstrapping, Self::Concluded)
                | (Self::Bootstrapping, Self::Failed)
                | (Self::Ready, Self::Ready)
                | (Self::Ready, Self::Concluded)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and progress of one interview.
///
/// `user_id` and `test_id` never change after bootstrap. `question_id` always
/// names the question currently awaiting an answer and only moves forward
/// through [`Session::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    test_id: String,
    job_title: String,
    question_id: String,
    state: SessionState,
}

impl Session {
    pub(crate) fn bootstrapping(
        user_id: impl Into<String>,
        test_id: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            test_id: test_id.into(),
            job_title: job_title.into(),
            question_id: String::new(),
            state: SessionState::Bootstrapping,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_concluded(&self) -> bool {
        self.state == SessionState::Concluded
    }

    pub(crate) fn transition(&mut self, next: SessionState) -> Result<(), GatewayError> {
        if !self.state.can_transition_to(next) {
            return Err(GatewayError::precondition(format!(
                "session {} cannot move from {} to {}",
                self.test_id, self.state, next
            )));
        }
        tracing::debug!(test_id = %self.test_id, from = %self.state, to = %next, "session state changed");
        self.state = next;
        Ok(())
    }

    /// Records the question the backend asked next.
    pub(crate) fn advance(
        &mut self,
        question_id: impl Into<String>,
        concluded: bool,
    ) -> Result<(), GatewayError> {
        let next = if concluded {
            SessionState::Concluded
        } else {
            SessionState::Ready
        };
        self.transition(next)?;
        self.question_id = question_id.into();
        Ok(())
    }
}

/// A live interview: the session plus its rendered conversation.
#[derive(Debug, Clone)]
pub struct Interview {
    pub(crate) session: Session,
    pub(crate) transcript: Transcript,
}

impl Interview {
    pub(crate) fn new(session: Session, transcript: Transcript) -> Self {
        Self {
            session,
            transcript,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_parts(self) -> (Session, Transcript) {
        (self.session, self.transcript)
    }
}
