//! Error types for the CI trigger client.

use thiserror::Error;

/// Result type alias using [`CiError`].
pub type CiResult<T> = Result<T, CiError>;

/// Errors that can occur when dispatching a workflow.
#[derive(Debug, Error)]
pub enum CiError {
    /// Required credentials or owner are missing from the configuration.
    ///
    /// Distinct from transient failure: retrying cannot help until the
    /// deployment is fixed.
    #[error("CI platform misconfigured: {0}")]
    Misconfigured(String),

    /// The CI platform answered with something other than 204.
    #[error("Workflow dispatch rejected: {status} - {message}")]
    Dispatch { status: u16, message: String },

    /// Transport failure reaching the CI platform.
    #[error("Connection to CI platform failed: {0}")]
    Http(#[from] reqwest::Error),
}
