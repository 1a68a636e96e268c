//! Application error handling
//!
//! Converts engine, validation and storage failures into JSON HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use peso_coach_shared::EngineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request DTO rejected by its `validator` rules
    #[error("Invalid request: {message}")]
    InvalidField { field: Option<String>, message: String },

    /// Engine rejected a window, month, log or projection parameters
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Too many logs in one request: {count} (limit {limit})")]
    TooManyLogs { count: usize, limit: usize },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

fn engine_code(err: &EngineError) -> &'static str {
    match err {
        EngineError::InvalidWindow(_) => "INVALID_WINDOW",
        EngineError::InvalidParams(_) => "INVALID_PARAMS",
        EngineError::InvalidLog(_) => "INVALID_LOG",
        EngineError::InvalidMonth(_) => "INVALID_MONTH",
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::InvalidField { field: name, message } => {
                field = name.clone();
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::Engine(err) => (StatusCode::BAD_REQUEST, engine_code(err), err.to_string()),
            ApiError::TooManyLogs { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "TOO_MANY_LOGS", self.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errs: validator::ValidationErrors) -> Self {
        // Struct-level rules report under "__all__"; name a real field when one failed
        let field = errs
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .filter(|k| k.as_str() != "__all__")
            .min();
        ApiError::InvalidField {
            field,
            message: errs.to_string(),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
