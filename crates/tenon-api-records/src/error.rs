//! Error types for the records API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur during record operations.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with the requested key.
    #[error("Item not found")]
    NotFound,

    /// The record changed since it was read; the caller must retry.
    #[error("Item was modified concurrently")]
    Conflict,

    /// Document store failure; detail is logged, not returned.
    #[error("Database error: {0}")]
    Store(String),
}

impl From<tenon_docstore::DocStoreError> for RecordsError {
    fn from(err: tenon_docstore::DocStoreError) -> Self {
        use tenon_docstore::DocStoreError;
        match err {
            DocStoreError::InvalidDocument(message) => Self::Validation(message),
            DocStoreError::NotFound => Self::NotFound,
            DocStoreError::Conflict => Self::Conflict,
            other => Self::Store(other.to_string()),
        }
    }
}

impl IntoResponse for RecordsError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            RecordsError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "validation_error", message.clone())
            }
            RecordsError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Item not found".to_string(),
            ),
            RecordsError::Conflict => (
                StatusCode::CONFLICT,
                "conflict",
                "Item was modified concurrently, retry the edit".to_string(),
            ),
            RecordsError::Store(detail) => {
                tracing::error!(%detail, "Document store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
