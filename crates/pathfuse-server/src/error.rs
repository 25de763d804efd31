//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pathfuse_analysis::{AnalysisError, PathError};
use pathfuse_core::CoreError;
use pathfuse_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn missing(parameter: &str) -> Self {
        ApiError::BadRequest(format!("missing parameter: {parameter}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": ApiErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::UnsupportedFormat { .. }
            | CoreError::InvalidSignature { .. }
            | CoreError::UnknownRelation { .. } => ApiError::BadRequest(err.to_string()),
            CoreError::CorruptBlob { .. }
            | CoreError::Serialization { .. }
            | CoreError::Export { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PathwayNotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::UnknownResource { .. }
            | StorageError::ResourceMismatch { .. }
            | StorageError::DuplicatePathway { .. } => ApiError::BadRequest(err.to_string()),
            StorageError::Core(core) => core.into(),
            StorageError::Sqlite(_) | StorageError::Migration(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptySelection => ApiError::BadRequest(err.to_string()),
            AnalysisError::PathwayNotFound { .. } => ApiError::NotFound(err.to_string()),
            AnalysisError::Core(core) => core.into(),
            AnalysisError::Storage(storage) => storage.into(),
        }
    }
}

impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NodeNotFound { .. } => ApiError::BadRequest(err.to_string()),
            PathError::NoPath { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}
