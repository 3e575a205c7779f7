use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tokio::time::Instant;

use crate::config::ApiConfig;
use crate::envelope::{normalize, normalize_envelope_first};
use crate::error::ApiError;
use crate::headers::build_headers;
use crate::payload::{AnswerData, AnswerRequest, StartChatData, StartChatRequest, TestRecord};
use crate::url::{endpoint_url, Endpoint};

/// Optional cancellation signal a host shares with an in-flight call.
pub type CancelSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Status and body of one backend response, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug)]
pub struct InterviewApiClient {
    http: Client,
    config: ApiConfig,
    in_flight: Arc<AtomicUsize>,
}

impl InterviewApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.access_token.trim().is_empty() {
            return Err(ApiError::MissingAccessToken);
        }
        endpoint_url(&config.base_url, &Endpoint::StartChat)?;

        let http = Client::builder()
            .build()
            .map_err(|error| ApiError::Transport(error.to_string()))?;
        Ok(Self {
            http,
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Number of calls whose [`CallScope`] is still alive.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn build_headers(&self, with_body: bool) -> Result<HeaderMap, ApiError> {
        let headers = build_headers(&self.config, with_body)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| ApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value)
                    .map_err(|_| ApiError::InvalidHeader(format!("invalid header value for {key}")))?,
            );
        }
        Ok(out)
    }

    pub fn build_request<P>(
        &self,
        endpoint: &Endpoint,
        payload: Option<&P>,
    ) -> Result<RequestBuilder, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let url = endpoint_url(&self.config.base_url, endpoint)?;
        let headers = self.build_headers(payload.is_some())?;
        let builder = self
            .http
            .request(endpoint.method(), url)
            .headers(headers);
        Ok(match payload {
            Some(payload) => builder.json(payload),
            None => builder,
        })
    }

    /// Issue one request bounded by `deadline`.
    ///
    /// Resolves to the raw response whatever its status; status and envelope
    /// interpretation belong to [`normalize`].
    pub async fn call<P>(
        &self,
        endpoint: &Endpoint,
        payload: Option<&P>,
        deadline: Duration,
        cancel: Option<&CancelSignal>,
    ) -> Result<RawResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let scope = CallScope::enter(deadline, cancel.cloned(), Arc::clone(&self.in_flight));
        let request = self.build_request(endpoint, payload)?;
        let started = Instant::now();
        tracing::info!(
            endpoint = endpoint.name(),
            deadline_ms = millis_u64(deadline),
            "backend call started"
        );

        let outcome = scope
            .run(async move {
                let response = request.send().await?;
                let status = response.status();
                let body = response.text().await?;
                Ok::<_, reqwest::Error>(RawResponse { status, body })
            })
            .await;
        let elapsed_ms = millis_u64(started.elapsed());

        match outcome {
            Ok(Ok(raw)) => {
                tracing::info!(
                    endpoint = endpoint.name(),
                    status = raw.status.as_u16(),
                    elapsed_ms,
                    "backend call finished"
                );
                Ok(raw)
            }
            Ok(Err(error)) => {
                let error = classify_request_error(&error, deadline);
                tracing::warn!(endpoint = endpoint.name(), elapsed_ms, %error, "backend call failed");
                Err(error)
            }
            Err(error) => {
                tracing::warn!(endpoint = endpoint.name(), elapsed_ms, %error, "backend call aborted");
                Err(error)
            }
        }
    }

    /// `POST /chat/start`.
    pub async fn start_chat(
        &self,
        request: &StartChatRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<StartChatData, ApiError> {
        let raw = self
            .call(&Endpoint::StartChat, Some(request), self.config.timeout, cancel)
            .await?;
        log_rejection(&Endpoint::StartChat, normalize(&raw))
    }

    /// `POST /chat/answer`.
    pub async fn submit_answer(
        &self,
        request: &AnswerRequest,
        cancel: Option<&CancelSignal>,
    ) -> Result<AnswerData, ApiError> {
        let raw = self
            .call(&Endpoint::Answer, Some(request), self.config.timeout, cancel)
            .await?;
        log_rejection(&Endpoint::Answer, normalize(&raw))
    }

    /// `GET /test/activate_code/{code}`.
    pub async fn lookup_activation_code(
        &self,
        code: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<TestRecord, ApiError> {
        let endpoint = Endpoint::ActivateCode(code.to_owned());
        let raw = self
            .call::<()>(&endpoint, None, self.config.timeout, cancel)
            .await?;
        log_rejection(&endpoint, normalize_envelope_first(&raw))
    }
}

/// Lifetime of one outbound call.
///
/// The scope owns the deadline and the optional cancel signal. [`CallScope::run`]
/// drives a future until it resolves, the deadline passes, or the signal is
/// raised; the future and any timer it armed are dropped before `run` returns.
/// Dropping the scope releases its in-flight slot exactly once.
#[derive(Debug)]
pub struct CallScope {
    timeout: Duration,
    deadline: Instant,
    cancel: Option<CancelSignal>,
    in_flight: Arc<AtomicUsize>,
}

impl CallScope {
    pub fn enter(
        timeout: Duration,
        cancel: Option<CancelSignal>,
        in_flight: Arc<AtomicUsize>,
    ) -> Self {
        in_flight.fetch_add(1, Ordering::AcqRel);
        Self {
            timeout,
            deadline: Instant::now() + timeout,
            cancel,
            in_flight,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|signal| signal.load(Ordering::Acquire))
    }

    /// Time left before the deadline, `None` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        let now = Instant::now();
        (now < self.deadline).then(|| self.deadline - now)
    }

    pub async fn run<F>(&self, future: F) -> Result<F::Output, ApiError>
    where
        F: Future,
    {
        let mut future = std::pin::pin!(future);

        loop {
            if self.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            let Some(remaining) = self.remaining() else {
                return Err(ApiError::Timeout(self.timeout));
            };
            let slice = if self.cancel.is_some() {
                remaining.min(CANCEL_POLL_INTERVAL)
            } else {
                remaining
            };

            // A response that already arrived wins over a late cancel; the
            // backend has acted on it.
            if let Ok(output) = tokio::time::timeout(slice, &mut future).await {
                return Ok(output);
            }
        }
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

fn millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn classify_request_error(error: &reqwest::Error, deadline: Duration) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(deadline)
    } else {
        ApiError::Transport(error.to_string())
    }
}

fn log_rejection<T>(endpoint: &Endpoint, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(error) = &result {
        tracing::warn!(endpoint = endpoint.name(), kind = ?error.kind(), %error, "backend response rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn run_returns_output_before_deadline() {
        let in_flight = counter();
        let scope = CallScope::enter(Duration::from_secs(5), None, Arc::clone(&in_flight));

        let output = scope
            .run(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                7
            })
            .await
            .expect("finishes in time");

        assert_eq!(output, 7);
        assert_eq!(in_flight.load(Ordering::Acquire), 1);
        drop(scope);
        assert_eq!(in_flight.load(Ordering::Acquire), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_times_out_at_deadline() {
        let in_flight = counter();
        let started = Instant::now();
        let result = {
            let scope = CallScope::enter(Duration::from_millis(200), None, Arc::clone(&in_flight));
            scope.run(std::future::pending::<()>()).await
        };

        assert!(matches!(result, Err(ApiError::Timeout(timeout)) if timeout == Duration::from_millis(200)));
        assert!(started.elapsed() < Duration::from_millis(250));
        assert_eq!(in_flight.load(Ordering::Acquire), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn raised_signal_cancels_pending_future() {
        let in_flight = counter();
        let signal: CancelSignal = Arc::new(AtomicBool::new(false));
        let scope = CallScope::enter(
            Duration::from_secs(60),
            Some(Arc::clone(&signal)),
            Arc::clone(&in_flight),
        );

        let raiser = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                signal.store(true, Ordering::Release);
            })
        };

        let result = scope.run(std::future::pending::<()>()).await;
        raiser.await.expect("raiser task");

        assert!(matches!(result, Err(ApiError::Cancelled)));
        drop(scope);
        assert_eq!(in_flight.load(Ordering::Acquire), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn output_ready_with_signal_raised_is_still_returned() {
        let in_flight = counter();
        let signal: CancelSignal = Arc::new(AtomicBool::new(false));
        let scope = CallScope::enter(
            Duration::from_secs(60),
            Some(Arc::clone(&signal)),
            Arc::clone(&in_flight),
        );

        let result = scope
            .run({
                let signal = Arc::clone(&signal);
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    signal.store(true, Ordering::Release);
                    "q2"
                }
            })
            .await;

        assert!(matches!(result, Ok("q2")));
        assert!(scope.is_cancelled());
    }

    #[test]
    fn millis_saturate_instead_of_truncating() {
        assert_eq!(millis_u64(Duration::from_millis(1_500)), 1_500);
        assert_eq!(millis_u64(Duration::MAX), u64::MAX);
    }

    #[test]
    fn client_requires_access_token() {
        let error = InterviewApiClient::new(ApiConfig::new("  ")).expect_err("blank token");
        assert!(matches!(error, ApiError::MissingAccessToken));
    }

    #[test]
    fn client_rejects_unparseable_base_url() {
        let error = InterviewApiClient::new(ApiConfig::new("tok").with_base_url("not a url"))
            .expect_err("bad base");
        assert!(matches!(error, ApiError::InvalidBaseUrl(_)));
    }
}
