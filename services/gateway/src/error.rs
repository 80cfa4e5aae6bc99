use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger::errors::LedgerError;
use serde_json::json;
use thiserror::Error;
use types::errors::{EngineError, ErrorKind};

/// Central error type for the gateway
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("ledger unavailable: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::Engine(err) => {
                let status = match err.kind() {
                    ErrorKind::Validation | ErrorKind::Resource => StatusCode::BAD_REQUEST,
                    ErrorKind::Authorization => StatusCode::FORBIDDEN,
                    ErrorKind::State => StatusCode::CONFLICT,
                    ErrorKind::Settlement => StatusCode::BAD_GATEWAY,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                };
                (status, err.to_string(), err.code())
            }
            AppError::Ledger(err) => (StatusCode::BAD_GATEWAY, err.to_string(), "LEDGER_ERROR"),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN"),
            AppError::RateLimitExceeded(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg, "RATE_LIMIT_EXCEEDED")
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}
