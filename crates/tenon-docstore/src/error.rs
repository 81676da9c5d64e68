//! Error types for the document store client.

use thiserror::Error;

/// Result type alias using [`DocStoreError`].
pub type DocStoreResult<T> = Result<T, DocStoreError>;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// Configuration validation error (bad endpoint, undecodable key, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The supplied document is not usable (missing or invalid `id`).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The requested document does not exist.
    #[error("Document not found")]
    NotFound,

    /// Write-back rejected because the document changed since it was read.
    #[error("Document was modified concurrently")]
    Conflict,

    /// The store rejected our credentials.
    #[error("Document store rejected credentials")]
    Unauthorized,

    /// The store returned an unexpected error status.
    #[error("Document store error: {status} - {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
