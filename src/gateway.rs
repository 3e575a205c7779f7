use std::fmt;
use std::sync::Arc;

use interview_api::CancelSignal;
use interview_backend::{BackendProfile, InterviewBackend};

use crate::bootstrap::{self, DefaultSessionProfile};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http_backend::HttpBackend;
use crate::session::Interview;
use crate::transcript::Message;
use crate::turn;

/// Host-facing entry point.
///
/// Holds one backend and the defaults for code-less sessions. Each
/// [`Interview`] it hands out is owned by the host; answers are serialized
/// because [`InterviewGateway::submit_answer`] borrows it mutably.
#[derive(Clone)]
pub struct InterviewGateway {
    backend: Arc<dyn InterviewBackend>,
    defaults: DefaultSessionProfile,
}

impl fmt::Debug for InterviewGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewGateway")
            .field("backend", &self.backend.profile())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl InterviewGateway {
    pub fn new(backend: Arc<dyn InterviewBackend>) -> Self {
        Self {
            backend,
            defaults: DefaultSessionProfile::default(),
        }
    }

    /// Gateway over the HTTP backend described by `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let backend = HttpBackend::new(config.api).map_err(GatewayError::from)?;
        Ok(Self::new(Arc::new(backend)).with_defaults(config.defaults))
    }

    pub fn with_defaults(mut self, defaults: DefaultSessionProfile) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &DefaultSessionProfile {
        &self.defaults
    }

    pub fn backend_profile(&self) -> BackendProfile {
        self.backend.profile()
    }

    /// Starts or resumes an interview, optionally from an activation code.
    pub async fn start_session(
        &self,
        activation_code: Option<&str>,
        cancel: Option<&CancelSignal>,
    ) -> Result<Interview, GatewayError> {
        bootstrap::bootstrap(self.backend.as_ref(), activation_code, &self.defaults, cancel).await
    }

    /// Answers the active question and returns the interviewer's reply.
    pub async fn submit_answer(
        &self,
        interview: &mut Interview,
        answer: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<Message, GatewayError> {
        turn::submit_answer(self.backend.as_ref(), interview, answer, cancel).await
    }
}
