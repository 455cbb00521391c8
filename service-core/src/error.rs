use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// `message` is what the client sees; `source` stays in the logs.
    #[error("{message}: {source}")]
    DatabaseError {
        message: String,
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn database(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::DatabaseError {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_)
            | AppError::DatabaseError { .. }
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::database("Database error", err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Request failed");
        }

        let message = match self {
            AppError::NotFound(err) => format!("Not found: {}", err),
            AppError::ServiceUnavailable(reason) => format!("Service unavailable: {}", reason),
            AppError::InternalError(_) => "Internal server error".to_string(),
            AppError::DatabaseError { message, .. } => message,
            AppError::ConfigError(_) => "Configuration error".to_string(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
