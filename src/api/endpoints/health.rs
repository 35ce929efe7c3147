//! Liveness endpoints.

use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::api::types::HealthResponse;

pub const ROOT_SERVICE_NAME: &str = "Medical Scan Analysis API - root";
pub const SERVICE_NAME: &str = "Medical Scan Analysis API";

pub fn health_status(service: &'static str, now: DateTime<Utc>) -> HealthResponse {
    HealthResponse {
        status: "healthy",
        service,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

/// `GET /`
pub async fn root() -> Json<HealthResponse> {
    Json(health_status(ROOT_SERVICE_NAME, Utc::now()))
}

/// `GET /health`
pub async fn check() -> Json<HealthResponse> {
    Json(health_status(SERVICE_NAME, Utc::now()))
}
