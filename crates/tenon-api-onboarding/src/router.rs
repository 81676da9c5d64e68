//! Router configuration for the onboarding API.

use axum::{routing::post, Router};
use std::sync::Arc;
use tenon_ci::DispatchClient;
use tenon_idp::ProvisioningWorkflow;

use crate::handlers::{create_app_handler, trigger_deploy_handler};

/// Shared state for the onboarding API.
#[derive(Clone)]
pub struct OnboardingState {
    /// Identity-provider provisioning chain.
    pub workflow: Arc<ProvisioningWorkflow>,
    /// CI workflow dispatch client.
    pub ci: Arc<DispatchClient>,
}

/// Create the onboarding router.
pub fn onboarding_router(workflow: Arc<ProvisioningWorkflow>, ci: Arc<DispatchClient>) -> Router {
    let state = OnboardingState { workflow, ci };

    Router::new()
        .route("/createApp", post(create_app_handler))
        .route("/trigger-deploy", post(trigger_deploy_handler))
        .with_state(state)
}
