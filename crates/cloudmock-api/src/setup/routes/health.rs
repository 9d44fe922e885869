//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the storage root exists and is a directory.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let root = state.storage.storage_root();
    let storage = match tokio::time::timeout(TIMEOUT, tokio::fs::metadata(root)).await {
        Ok(Ok(meta)) if meta.is_dir() => "ready".to_string(),
        Ok(Ok(_)) => {
            tracing::error!(storage_root = %root.display(), "Storage root is not a directory");
            "not_ready: not a directory".to_string()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, storage_root = %root.display(), "Storage readiness check failed");
            format!("not_ready: {}", e.kind())
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            "timeout".to_string()
        }
    };

    let ready = storage == "ready";
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "storage": storage,
        })),
    )
}
