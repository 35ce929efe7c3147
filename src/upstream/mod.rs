//! Client side of the hosted vision model.
//!
//! `VisionClient` is the seam the orchestrator depends on. `AzureOpenAiClient`
//! talks to an Azure OpenAI chat-completions deployment; `MockVisionClient`
//! replays canned replies in tests.

pub mod azure;
pub mod mock;
pub mod types;

pub use azure::{is_tls_failure, AzureOpenAiClient};
pub use mock::MockVisionClient;
pub use types::{ImageDetail, VisionRequest};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Connection error: could not reach {0}")]
    Connection(String),

    #[error("TLS handshake with {0} failed")]
    Tls(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Upstream model returned error (status {status})")]
    Status { status: u16, body: String },

    #[error("Could not decode upstream response: {0}")]
    Decode(String),

    #[error("Upstream model returned no content")]
    EmptyReply,

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl UpstreamError {
    /// The upstream host could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_))
    }

    /// Worth another attempt: transport hiccups, conflicts, throttling and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => matches!(*status, 408 | 409 | 429) || *status >= 500,
            _ => false,
        }
    }
}

/// Vision-capable chat completion (allows mocking).
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Send one image + instruction and return the model's reply text.
    async fn complete(&self, request: &VisionRequest) -> Result<String, UpstreamError>;
}
