//! Error types for the identity management client.

use thiserror::Error;

/// Result type alias using [`IdpError`].
pub type IdpResult<T> = Result<T, IdpError>;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdpError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Machine-credential token exchange failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Request input failed validation before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The Management API rejected a call.
    #[error("Management API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
