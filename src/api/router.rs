//! HTTP router for the scan analysis API.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! The static frontend is mounted under `/ui` only when its directory exists.

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MULTIPART_OVERHEAD_BYTES;

/// Build the API router.
///
/// The body limit leaves room for multipart framing so that the
/// per-image size check in the analyzer, not the transport, decides.
pub fn api_router(ctx: ApiContext, frontend_dir: Option<&Path>) -> Router {
    let body_limit = ctx.analyzer.max_image_bytes() + MULTIPART_OVERHEAD_BYTES;

    let mut router = Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route(
            "/analyze/breast-ultrasound",
            post(endpoints::analyze::breast_ultrasound),
        )
        .route("/analyze/pcos", post(endpoints::analyze::pcos))
        .route("/report/generate", post(endpoints::report::generate))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(ctx);

    match frontend_dir {
        Some(dir) if dir.is_dir() => {
            tracing::info!(dir = %dir.display(), "Serving frontend under /ui");
            router = router.nest_service("/ui", ServeDir::new(dir));
        }
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "Frontend directory not found, /ui disabled");
        }
        None => {}
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
