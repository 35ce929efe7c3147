use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, VisionRequest};
use super::{UpstreamError, VisionClient};
use crate::config::UpstreamConfig;

/// Upper bound on connection establishment, independent of the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(8);

/// Azure OpenAI chat-completions client for a single vision deployment.
///
/// Built once per process from `UpstreamConfig`. Retries transient failures
/// up to `max_retries` times with doubling backoff.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    credential: String,
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff: Duration,
}

impl AzureOpenAiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout));

        if !config.verify_ssl {
            tracing::warn!(
                endpoint = %config.endpoint,
                "TLS certificate verification DISABLED for upstream model (VERIFY_SSL=false); debug use only"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| UpstreamError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
            credential: config.credential.clone(),
            timeout_secs: config.timeout.as_secs(),
            max_retries: config.max_retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    /// Override the first retry delay.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(1u32 << attempt.min(16))
            .min(MAX_RETRY_BACKOFF)
    }

    async fn send_once(&self, body: &ChatCompletionRequest<'_>) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.credential)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        parsed.into_content().ok_or(UpstreamError::EmptyReply)
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else if is_tls_failure(&err) {
            UpstreamError::Tls(self.endpoint.clone())
        } else if err.is_connect() {
            UpstreamError::Connection(self.endpoint.clone())
        } else {
            UpstreamError::HttpClient(err.to_string())
        }
    }
}

#[async_trait]
impl VisionClient for AzureOpenAiClient {
    async fn complete(&self, request: &VisionRequest) -> Result<String, UpstreamError> {
        let body = ChatCompletionRequest::from_vision(request);
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(&body).await {
                Ok(content) => return Ok(content),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        error = %err,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Upstream model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    if let UpstreamError::Status { status, body } = &err {
                        tracing::error!(status, body = %body, "Upstream model returned error");
                    }
                    return Err(err);
                }
            }
        }
    }
}

/// Walk the source chain looking for certificate / handshake failures.
pub fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("handshake") || text.contains("tls") {
            return true;
        }
        source = inner.source();
    }
    false
}
