//! Error types for the graph layer and the HTTP API.
//!
//! [`GraphError`] is what a lifecycle operation fails with; the runtime
//! renders it into a failed [`Reply`](crate::schema::common::Reply) rather
//! than an HTTP error, since a failed reply is a normal protocol outcome.
//! [`ApiError`] is the unified error type for HTTP endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use kvgraph_core::CoreError;
use kvgraph_storage::StorageError;

/// Failure of a vertex, edge or mirror operation.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The request was rejected before any write.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored body could not be parsed.
    #[error("stored body is not valid JSON: {0}")]
    CorruptBody(#[from] serde_json::Error),

    /// The target's mirror entry point rejected a register/unregister.
    #[error("mirror call to {address} failed: {message}")]
    Mirror { address: String, message: String },

    /// One or more cascaded edge deletes failed; the vertex body was kept.
    #[error("cascaded edge delete failed: {}", .0.join(" "))]
    Cascade(Vec<String>),

    /// A mirror operation arrived without a caller to derive the source from.
    #[error("caller address is required to derive the in-edge source")]
    MissingCaller,
}

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
    /// Entity or operation not found (404).
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
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::InternalError(msg) => {
                msg
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
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(core) => ApiError::from(core),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Validation(msg) => ApiError::BadRequest(msg),
            GraphError::Core(core) => ApiError::from(core),
            GraphError::Storage(storage) => ApiError::from(storage),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
