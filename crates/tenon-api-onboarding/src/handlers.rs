//! Request handlers for the onboarding API.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tenon_ci::CiError;
use tenon_idp::ProvisionOutcome;

use crate::error::OnboardingError;
use crate::models::{CreateAppRequest, TriggerDeployRequest, TriggerDeployResponse};
use crate::router::OnboardingState;

/// POST /createApp
///
/// Runs the provisioning chain: application, organization, connection,
/// invitation. Validation happens before any remote call, so a 400 means
/// nothing was created at the identity provider.
pub async fn create_app_handler(
    State(state): State<OnboardingState>,
    Json(request): Json<CreateAppRequest>,
) -> Result<(StatusCode, Json<ProvisionOutcome>), OnboardingError> {
    let provision = request.into_provision_request()?;
    let outcome = state.workflow.provision(provision).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /trigger-deploy
///
/// Dispatches a workflow run on the `main` branch of the configured owner's
/// repository. A rejection from the CI platform is mirrored back with its
/// original status code.
pub async fn trigger_deploy_handler(
    State(state): State<OnboardingState>,
    Json(request): Json<TriggerDeployRequest>,
) -> Result<Json<TriggerDeployResponse>, OnboardingError> {
    request.validate()?;
    let repo = request.repo.unwrap_or_default();
    let workflow_id = request.workflow_id.unwrap_or_default();
    let inputs = request.inputs;

    match state.ci.dispatch(&repo, &workflow_id, inputs.clone()).await {
        Ok(()) => Ok(Json(TriggerDeployResponse {
            status: "Workflow triggered successfully".into(),
            repo,
            workflow_id,
            inputs: inputs.unwrap_or_else(|| json!({})),
        })),
        Err(CiError::Dispatch { status, message }) => {
            tracing::warn!(status, %message, %repo, %workflow_id, "Workflow dispatch rejected");
            Err(OnboardingError::DispatchRejected {
                status,
                repo,
                workflow_id,
            })
        }
        Err(other) => Err(other.into()),
    }
}
