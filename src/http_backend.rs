//! [`InterviewBackend`] over the real HTTP API.

use async_trait::async_trait;
use interview_api::{
    AnswerData, AnswerRequest, ApiConfig, ApiError, CancelSignal, InterviewApiClient,
    StartChatData, StartChatRequest, TestRecord,
};
use interview_backend::{BackendProfile, InterviewBackend};

pub const HTTP_BACKEND_ID: &str = "http";

#[derive(Debug)]
pub struct HttpBackend {
    client: InterviewApiClient,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: InterviewApiClient::new(config)?,
        })
    }

    pub fn from_client(client: InterviewApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &InterviewApiClient {
        &self.client
    }
}

#[async_trait]
impl InterviewBackend for HttpBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            backend_id: HTTP_BACKEND_ID.to_string(),
            endpoint: self.client.config().base_url.clone(),
        }
    }

    async fn lookup_test(
        &self,
        activation_code: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<TestRecord, ApiError> {
        self.client.lookup_activation_code(activation_code, cancel).await
    }

    async fn start_chat(
        &self,
        request: &StartChatRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<StartChatData, ApiError> {
        self.client.start_chat(request, cancel).await
    }

    async fn submit_answer(
        &self,
        request: &AnswerRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<AnswerData, ApiError> {
        self.client.submit_answer(request, cancel).await
    }
}
