use axum::{http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub const GREETING: &str = "Hello from the stories API!";

pub async fn greeting() -> impl IntoResponse {
    Json(json!({ "message": GREETING }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{}", uri.path()))
}
