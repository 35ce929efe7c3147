//! Single-scan analysis: validate → encode → prompt → vision call → normalize.
//!
//! Stateless per request. The only suspending step is the upstream call;
//! retries and timeouts live in the client behind `VisionClient`.

use std::sync::Arc;

use base64::Engine as _;
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use super::mime::{data_url, image_mime_type};
use super::parser::normalize_reply;
use super::prompt::{prompt_for, SYSTEM_INSTRUCTION};
use super::types::{AnalysisResult, ImageUpload, ScanType};
use super::{AnalysisError, CONNECTIVITY_FAILURE_MESSAGE};
use crate::config::MAX_IMAGE_BYTES;
use crate::upstream::{UpstreamError, VisionClient, VisionRequest};

pub struct ScanAnalyzer {
    client: Arc<dyn VisionClient>,
    max_image_bytes: usize,
}

impl ScanAnalyzer {
    pub fn new(client: Arc<dyn VisionClient>) -> Self {
        Self {
            client,
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Analyze one uploaded scan.
    ///
    /// Input validation fails before any upstream call. Upstream failures
    /// become `UpstreamFailure`; an unparseable reply is not an error and
    /// yields the degraded `analysis_failed` result instead.
    pub async fn analyze(
        &self,
        upload: &ImageUpload,
        hint: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let scan_type = ScanType::from_hint(hint);
        let span = tracing::info_span!(
            "scan_analysis",
            request_id = %Uuid::new_v4(),
            hint = hint.unwrap_or(""),
            scan_type = %scan_type,
            image_size = upload.bytes.len(),
        );

        async move {
            validate_upload(upload, self.max_image_bytes)?;

            let start = std::time::Instant::now();
            let encoded = base64::engine::general_purpose::STANDARD.encode(&upload.bytes);
            let mime_type = image_mime_type(upload.filename.as_deref());
            let request = VisionRequest::analysis(
                SYSTEM_INSTRUCTION,
                prompt_for(scan_type),
                data_url(mime_type, &encoded),
            );

            let reply = self.client.complete(&request).await.map_err(|e| {
                tracing::error!(error = %e, "Upstream model call failed");
                AnalysisError::UpstreamFailure(upstream_cause(&e))
            })?;

            let result = normalize_reply(&reply, Utc::now());

            tracing::info!(
                elapsed_ms = %start.elapsed().as_millis(),
                mime_type,
                classification = %result.classification,
                confidence = %result.confidence,
                findings = result.findings.len(),
                "Scan analysis complete"
            );

            Ok::<_, AnalysisError>(result)
        }
        .instrument(span)
        .await
    }
}

/// Reject non-image content types and oversized payloads.
pub fn validate_upload(upload: &ImageUpload, max_bytes: usize) -> Result<(), AnalysisError> {
    let is_image = upload
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        tracing::warn!(content_type = ?upload.content_type, "Rejected non-image upload");
        return Err(AnalysisError::InvalidInput("File must be an image".into()));
    }

    if upload.bytes.len() > max_bytes {
        tracing::warn!(size = upload.bytes.len(), limit = max_bytes, "Rejected oversized upload");
        return Err(AnalysisError::PayloadTooLarge {
            size: upload.bytes.len(),
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Human-readable cause for an upstream failure.
fn upstream_cause(err: &UpstreamError) -> String {
    if err.is_connectivity() {
        CONNECTIVITY_FAILURE_MESSAGE.to_string()
    } else {
        err.to_string()
    }
}
