use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::VisionRequest;
use super::{UpstreamError, VisionClient};

/// Mock vision client for testing. Returns a configurable reply and
/// records every request it receives.
pub struct MockVisionClient {
    reply: Result<String, UpstreamError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<VisionRequest>>,
}

impl MockVisionClient {
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(reply: Result<String, UpstreamError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<VisionRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn complete(&self, request: &VisionRequest) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        self.reply.clone()
    }
}
