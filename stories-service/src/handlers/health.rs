use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::get_metrics;
use crate::startup::AppState;

const SERVICE_NAME: &str = "stories-service";

async fn database_up(state: &AppState) -> Result<(), String> {
    let store = state.gate.store().map_err(|e| e.to_string())?;
    store
        .health_check()
        .await
        .map_err(|_| "database ping failed".to_string())
}

/// Liveness plus database status.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match database_up(&state).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "up"
            })),
        ),
        Err(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "down",
                "error": reason
            })),
        ),
    }
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match database_up(&state).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "error": reason })),
        ),
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
