use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::completion::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Parse and Schema failures surface unmodified from the pipeline: a hard
/// failure is never downgraded to a caveated success. The response body shape
/// keeps the two unmistakable (error envelope vs gate outcome).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unusable input: {0}")]
    Input(String),

    #[error("Completion contained no parseable JSON")]
    Parse { snippet: String },

    #[error("Architecture failed validation: {0}")]
    Schema(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", msg.clone()),
            AppError::Parse { snippet } => {
                // The snippet is raw model output: log it, never echo it.
                tracing::error!("Parse error, cleaned completion began: {snippet}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PARSE_ERROR",
                    "The model completion contained no parseable JSON".to_string(),
                )
            }
            AppError::Schema(msg) => {
                // The violation list describes model output, not secrets:
                // echo it so the rendering layer can show what went wrong.
                tracing::warn!("Schema error: {msg}");
                (StatusCode::BAD_GATEWAY, "SCHEMA_ERROR", msg.clone())
            }
            AppError::Provider(ProviderError::Unauthorized) => {
                tracing::error!("Completion provider rejected this service's credential");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_UNAUTHORIZED",
                    "The completion provider rejected this service's credential".to_string(),
                )
            }
            AppError::Provider(ProviderError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                "PROVIDER_RATE_LIMITED",
                "The completion provider is rate limiting requests; retry shortly".to_string(),
            ),
            AppError::Provider(ProviderError::Service(msg)) => {
                tracing::error!("Completion provider error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "The completion provider returned an error".to_string(),
                )
            }
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
