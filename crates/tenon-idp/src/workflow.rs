//! Tenant provisioning workflow: application, organization, connection,
//! invitation — with reverse-order compensation on partial failure.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{IdpError, IdpResult};
use crate::management::ManagementClient;

/// Login URI used when the request does not supply one.
pub const DEFAULT_INITIATE_LOGIN_URI: &str = "http://localhost:3000/login";

/// Callback URL used when the request does not supply any.
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/callback";

/// Logout URL used when the request does not supply any.
pub const DEFAULT_LOGOUT_URL: &str = "http://localhost:3000";

/// A validated provisioning request.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Application display name.
    pub app_name: String,
    /// Organization display name; the machine name is derived from it.
    pub org_name: String,
    /// Email address of the first member to invite.
    pub email: String,
    pub initiate_login_uri: Option<String>,
    pub callback_urls: Option<Vec<String>>,
    pub logout_urls: Option<Vec<String>>,
}

impl ProvisionRequest {
    /// Check the required fields, naming every missing one.
    pub fn validate(&self) -> IdpResult<()> {
        let mut missing = Vec::new();
        if self.app_name.trim().is_empty() {
            missing.push("app_name");
        }
        if self.org_name.trim().is_empty() {
            missing.push("org_name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IdpError::Validation(format!(
                "missing required parameters: {}",
                missing.join(", ")
            )))
        }
    }

    fn initiate_login_uri(&self) -> String {
        self.initiate_login_uri
            .clone()
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| DEFAULT_INITIATE_LOGIN_URI.to_string())
    }

    fn callback_urls(&self) -> Vec<String> {
        self.callback_urls
            .clone()
            .filter(|urls| !urls.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_CALLBACK_URL.to_string()])
    }

    fn logout_urls(&self) -> Vec<String> {
        self.logout_urls
            .clone()
            .filter(|urls| !urls.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_LOGOUT_URL.to_string()])
    }
}

/// Result of a completed provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionOutcome {
    pub client_id: String,
    pub org_id: String,
    pub invitation_url: String,
    pub initiate_login_uri: String,
    pub callback_urls: Vec<String>,
}

/// Executes the provisioning chain against the identity provider.
///
/// The chain is strictly sequential: token, application, organization,
/// connection attachment, invitation. There is no local transaction, so a
/// mid-chain failure triggers best-effort deletion of the remote objects
/// created so far, in reverse order. Rollback failures are logged and never
/// mask the original error.
#[derive(Debug, Clone)]
pub struct ProvisioningWorkflow {
    client: Arc<ManagementClient>,
}

impl ProvisioningWorkflow {
    pub fn new(client: Arc<ManagementClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self, request), fields(app_name = %request.app_name, org_name = %request.org_name))]
    pub async fn provision(&self, request: ProvisionRequest) -> IdpResult<ProvisionOutcome> {
        request.validate()?;

        let initiate_login_uri = request.initiate_login_uri();
        let callback_urls = request.callback_urls();
        let logout_urls = request.logout_urls();

        // Token first: a failed credential exchange must abort before any
        // remote object exists.
        self.client.authenticate().await?;

        let app = self
            .client
            .create_client(
                &request.app_name,
                &callback_urls,
                &logout_urls,
                &initiate_login_uri,
            )
            .await?;

        let org = match self.client.create_organization(&request.org_name).await {
            Ok(org) => org,
            Err(err) => {
                self.undo_client(&app.client_id).await;
                return Err(err);
            }
        };

        if let Err(err) = self.client.add_organization_connection(&org.id).await {
            self.undo_organization(&org.id).await;
            self.undo_client(&app.client_id).await;
            return Err(err);
        }

        let invitation = match self
            .client
            .create_invitation(&org.id, &app.client_id, &request.email)
            .await
        {
            Ok(invitation) => invitation,
            Err(err) => {
                self.undo_connection(&org.id).await;
                self.undo_organization(&org.id).await;
                self.undo_client(&app.client_id).await;
                return Err(err);
            }
        };

        info!(
            client_id = %app.client_id,
            org_id = %org.id,
            "Tenant provisioned"
        );

        Ok(ProvisionOutcome {
            client_id: app.client_id,
            org_id: org.id,
            invitation_url: invitation.ticket_url,
            initiate_login_uri,
            callback_urls,
        })
    }

    async fn undo_client(&self, client_id: &str) {
        if let Err(err) = self.client.delete_client(client_id).await {
            warn!(client_id, %err, "Rollback failed: application left behind");
        }
    }

    async fn undo_organization(&self, org_id: &str) {
        if let Err(err) = self.client.delete_organization(org_id).await {
            warn!(org_id, %err, "Rollback failed: organization left behind");
        }
    }

    async fn undo_connection(&self, org_id: &str) {
        if let Err(err) = self.client.remove_organization_connection(org_id).await {
            warn!(org_id, %err, "Rollback failed: connection left attached");
        }
    }
}
