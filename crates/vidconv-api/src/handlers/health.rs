use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// Liveness plus a check that both storage directories are still present.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uploads = tokio::fs::metadata(state.store.upload_dir())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let converted = tokio::fs::metadata(state.store.converted_dir())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let (status, label) = if uploads && converted {
        (StatusCode::OK, "alive")
    } else {
        tracing::warn!(uploads, converted, "Storage directory missing");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "uploads": uploads,
            "converted": converted,
        })),
    )
}
