//! API error types with structured JSON responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            // Reported as 400, not 413.
            ApiError::PayloadTooLarge(detail) => {
                (StatusCode::BAD_REQUEST, "PAYLOAD_TOO_LARGE", detail)
            }
            ApiError::Upstream(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_FAILURE", detail)
            }
        };

        (status, Json(ErrorBody { detail, code })).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput(detail) => ApiError::BadRequest(detail),
            e @ AnalysisError::PayloadTooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            e @ AnalysisError::UpstreamFailure(_) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!(
                "Image too large. Max {}MB.",
                crate::config::MAX_IMAGE_BYTES / (1024 * 1024)
            ))
        } else {
            ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
