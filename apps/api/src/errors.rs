use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant is recoverable: the failing request is answered and the
/// session stays as it was before the request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Stored document or editor text is not valid résumé JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A gateway credential or endpoint is missing or still a placeholder.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A gateway answered with a failure status or an unreadable body.
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Gateway timed out: {0}")]
    Timeout(String),

    /// Required user input is missing or unusable.
    #[error("Input error: {0}")]
    Input(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Another tailoring or export call is still running.
    #[error("Busy: {0}")]
    Busy(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Parse(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PARSE_ERROR",
                msg.clone(),
            ),
            AppError::Configuration(msg) => {
                tracing::warn!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Gateway(msg) => {
                tracing::error!("Gateway error: {msg}");
                (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", msg.clone())
            }
            AppError::Timeout(msg) => {
                tracing::error!("Gateway timeout: {msg}");
                (StatusCode::GATEWAY_TIMEOUT, "GATEWAY_TIMEOUT", msg.clone())
            }
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Busy(msg) => (StatusCode::CONFLICT, "BUSY", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
