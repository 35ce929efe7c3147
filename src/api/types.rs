//! Shared state and response bodies for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::{AnalysisResult, ScanAnalyzer};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes. Holds no per-request state.
#[derive(Clone)]
pub struct ApiContext {
    pub analyzer: Arc<ScanAnalyzer>,
}

impl ApiContext {
    pub fn new(analyzer: Arc<ScanAnalyzer>) -> Self {
        Self { analyzer }
    }
}

// ═══════════════════════════════════════════════════════════
// Response bodies
// ═══════════════════════════════════════════════════════════

/// `AnalysisResult` fields plus `success`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanAnalysisResponse {
    pub success: bool,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl From<AnalysisResult> for ScanAnalysisResponse {
    fn from(analysis: AnalysisResult) -> Self {
        Self {
            success: true,
            analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub patient_id: String,
    pub report_text: String,
    pub analysis: ScanAnalysisResponse,
    pub generated_at: String,
}
