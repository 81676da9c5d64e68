//! Error types for the onboarding API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur during onboarding operations.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// Required request fields are absent.
    #[error("Missing required parameters: {}", missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },

    /// The provisioning chain failed; detail is logged, not returned.
    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    /// Required server-side credentials are not configured.
    #[error("Server misconfiguration: {0}")]
    Misconfigured(String),

    /// The CI platform rejected the dispatch; its status is mirrored.
    #[error("Workflow dispatch rejected with status {status}")]
    DispatchRejected {
        status: u16,
        repo: String,
        workflow_id: String,
    },

    /// Transport failure reaching an upstream service.
    #[error("Upstream connection failed: {0}")]
    Upstream(String),
}

impl From<tenon_idp::IdpError> for OnboardingError {
    fn from(err: tenon_idp::IdpError) -> Self {
        use tenon_idp::IdpError;
        match err {
            IdpError::Validation(message) => {
                // Field presence is checked before provisioning, so this is
                // only reachable for whitespace-only values.
                Self::Provisioning(message)
            }
            other => Self::Provisioning(other.to_string()),
        }
    }
}

impl From<tenon_ci::CiError> for OnboardingError {
    fn from(err: tenon_ci::CiError) -> Self {
        use tenon_ci::CiError;
        match err {
            CiError::Misconfigured(message) => Self::Misconfigured(message),
            CiError::Http(e) => Self::Upstream(e.to_string()),
            CiError::Dispatch { status, message } => {
                // Callers that know the repo/workflow should construct
                // DispatchRejected directly; this path keeps the status.
                tracing::warn!(status, %message, "Workflow dispatch rejected");
                Self::DispatchRejected {
                    status,
                    repo: String::new(),
                    workflow_id: String::new(),
                }
            }
        }
    }
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        match &self {
            OnboardingError::MissingFields { missing } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": format!("Missing required parameters: {}", missing.join(", ")),
                    "missing": missing,
                })),
            )
                .into_response(),
            OnboardingError::Provisioning(detail) => {
                tracing::error!(%detail, "Provisioning failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal_error",
                        "message": "Internal server error",
                    })),
                )
                    .into_response()
            }
            OnboardingError::Misconfigured(detail) => {
                tracing::error!(%detail, "Server misconfiguration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "misconfiguration",
                        "message": "Server misconfiguration",
                    })),
                )
                    .into_response()
            }
            OnboardingError::DispatchRejected {
                status,
                repo,
                workflow_id,
            } => {
                let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    status,
                    Json(json!({
                        "error": "dispatch_failed",
                        "message": "Failed to trigger workflow",
                        "repo": repo,
                        "workflow_id": workflow_id,
                    })),
                )
                    .into_response()
            }
            OnboardingError::Upstream(detail) => {
                tracing::error!(%detail, "Upstream connection failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "upstream_error",
                        "message": "Connection to upstream service failed",
                    })),
                )
                    .into_response()
            }
        }
    }
}
