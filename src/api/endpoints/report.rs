//! Report generation endpoint: analyze, then render the text report.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};

use crate::analysis::{format_report, PatientInfo};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ReportResponse};
use crate::api::upload::read_upload_form;

/// `POST /report/generate`: multipart `file`, `patient_id`, optional
/// `patient_name` and `scan_type`.
pub async fn generate(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let mut form = read_upload_form(multipart?).await?;

    let patient_id = form
        .text("patient_id")
        .ok_or_else(|| ApiError::BadRequest("patient_id is required".into()))?
        .to_string();
    let patient = PatientInfo {
        patient_id,
        patient_name: form.text("patient_name").map(str::to_string),
    };
    let upload = form.take_file()?;

    let analysis = ctx
        .analyzer
        .analyze(&upload, form.text("scan_type"))
        .await?;

    let now = Utc::now();
    let report_text = format_report(&analysis, &patient, now);
    tracing::info!(
        patient_id = %patient.patient_id,
        report_len = report_text.len(),
        "Report generated"
    );

    Ok(Json(ReportResponse {
        success: true,
        patient_id: patient.patient_id,
        report_text,
        analysis: analysis.into(),
        generated_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}
