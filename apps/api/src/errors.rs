use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to fetch posts: {0}")]
    Fetch(String),
}

impl AppError {
    /// Status, client-facing summary and optional details for this error.
    pub fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::MissingConfiguration(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::Llm(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate blog post".to_string(),
                Some(msg.clone()),
            ),
            AppError::ResponseParse(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to parse AI response".to_string(),
                Some(msg.clone()),
            ),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A storage error occurred".to_string(),
                Some(msg.clone()),
            ),
            AppError::Fetch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch posts".to_string(),
                None,
            ),
        }
    }

    /// Client-facing summary, as it appears in the `error` field.
    pub fn summary(&self) -> String {
        self.parts().1
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.parts();

        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }

        let body = match details {
            Some(details) => Json(json!({ "error": message, "details": details })),
            None => Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}
