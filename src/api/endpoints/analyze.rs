//! Scan analysis endpoints.
//!
//! The three routes differ only in where the scan-type hint comes from:
//! the optional `scan_type` form field, or a fixed hint per route.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ScanAnalysisResponse};
use crate::api::upload::read_upload_form;

pub const BREAST_ULTRASOUND_HINT: &str = "breast_ultrasound";
pub const PCOS_ULTRASOUND_HINT: &str = "pcos_ultrasound";

/// `POST /analyze`: multipart `file` with optional `scan_type`.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanAnalysisResponse>, ApiError> {
    run_analysis(&ctx, multipart?, None).await
}

/// `POST /analyze/breast-ultrasound`
pub async fn breast_ultrasound(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanAnalysisResponse>, ApiError> {
    run_analysis(&ctx, multipart?, Some(BREAST_ULTRASOUND_HINT)).await
}

/// `POST /analyze/pcos`
pub async fn pcos(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanAnalysisResponse>, ApiError> {
    run_analysis(&ctx, multipart?, Some(PCOS_ULTRASOUND_HINT)).await
}

/// A fixed hint wins over any `scan_type` field in the form.
async fn run_analysis(
    ctx: &ApiContext,
    multipart: Multipart,
    fixed_hint: Option<&str>,
) -> Result<Json<ScanAnalysisResponse>, ApiError> {
    let mut form = read_upload_form(multipart).await?;
    let upload = form.take_file()?;
    let hint = fixed_hint.or_else(|| form.text("scan_type"));

    let analysis = ctx.analyzer.analyze(&upload, hint).await?;
    Ok(Json(analysis.into()))
}
