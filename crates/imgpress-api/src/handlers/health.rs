//! Health check handlers.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub uploads: String,
    pub compressed: String,
    /// Codec slots not currently in use
    pub codec_slots_available: usize,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - both storage directories are present.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to accept uploads", body = ReadinessResponse),
        (status = 503, description = "A storage directory is missing", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uploads = check_dir(state.uploads.base_path()).await;
    let compressed = check_dir(state.compressed().base_path()).await;

    let ready = uploads == "healthy" && compressed == "healthy";
    let status = if ready {
        StatusCode::OK
    } else {
        tracing::warn!(uploads = %uploads, compressed = %compressed, "Readiness check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            uploads,
            compressed,
            codec_slots_available: state.pipeline.pool().available(),
        }),
    )
}

async fn check_dir(path: &Path) -> String {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => "healthy".to_string(),
        Ok(_) => "not a directory".to_string(),
        Err(e) => format!("unavailable: {}", e),
    }
}
