//! Auth0 Management API v2 client.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::config::IdpConfig;
use crate::error::{IdpError, IdpResult};
use crate::slug::org_slug;
use crate::token::TokenCache;

/// Client-wide request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Inviter name recorded on organization invitations.
const INVITER_NAME: &str = "System Admin";

/// Created application, as returned by the Management API.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedClient {
    pub client_id: String,
}

/// Created organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrganization {
    pub id: String,
}

/// Created organization invitation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedInvitation {
    /// URL the invitee follows to accept; expiry is managed by the provider.
    pub ticket_url: String,
}

/// Error body returned by the Management API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: String,
}

/// Typed wrapper over the Management API calls the provisioning workflow
/// needs. Every call carries a bearer token from the shared [`TokenCache`].
#[derive(Debug)]
pub struct ManagementClient {
    http: reqwest::Client,
    api_base: String,
    tokens: Arc<TokenCache>,
    connection_id: String,
}

impl ManagementClient {
    /// Create a client after validating the configuration.
    pub fn new(config: IdpConfig) -> IdpResult<Self> {
        config.validate()?;
        let api_base = config.api_base();
        let token_url = config.token_url();
        Self::with_endpoints(config, api_base, token_url)
    }

    /// Construct against explicit endpoints, for tests that point both the
    /// token exchange and the API at a local mock server.
    pub fn with_endpoints(
        config: IdpConfig,
        api_base: String,
        token_url: String,
    ) -> IdpResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdpError::Config(format!("failed to build HTTP client: {e}")))?;
        let connection_id = config.connection_id.clone();
        Ok(Self {
            http,
            api_base,
            tokens: Arc::new(TokenCache::with_token_url(config, token_url)),
            connection_id,
        })
    }

    /// Eagerly acquire an access token.
    ///
    /// The provisioning workflow calls this first so a failed credential
    /// exchange aborts before any remote object is created.
    pub async fn authenticate(&self) -> IdpResult<()> {
        self.tokens.get_token().await.map(|_| ())
    }

    /// Create a single-page application requiring organization sign-in.
    #[instrument(skip(self, callbacks, logout_urls, initiate_login_uri))]
    pub async fn create_client(
        &self,
        name: &str,
        callbacks: &[String],
        logout_urls: &[String],
        initiate_login_uri: &str,
    ) -> IdpResult<CreatedClient> {
        self.request(
            Method::POST,
            "/clients",
            Some(json!({
                "name": name,
                "app_type": "spa",
                "callbacks": callbacks,
                "allowed_logout_urls": logout_urls,
                "initiate_login_uri": initiate_login_uri,
                "organization_usage": "require",
                "token_endpoint_auth_method": "none",
                "oidc_conformant": true,
            })),
        )
        .await
    }

    /// Delete an application (compensation path).
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: &str) -> IdpResult<()> {
        self.request_no_body(Method::DELETE, &format!("/clients/{client_id}"))
            .await
    }

    /// Create an organization named by the slug of `display_name`.
    #[instrument(skip(self))]
    pub async fn create_organization(&self, display_name: &str) -> IdpResult<CreatedOrganization> {
        self.request(
            Method::POST,
            "/organizations",
            Some(json!({
                "name": org_slug(display_name),
                "display_name": display_name,
            })),
        )
        .await
    }

    /// Delete an organization (compensation path).
    #[instrument(skip(self))]
    pub async fn delete_organization(&self, org_id: &str) -> IdpResult<()> {
        self.request_no_body(Method::DELETE, &format!("/organizations/{org_id}"))
            .await
    }

    /// Attach the configured connection to an organization, auto-assigning
    /// membership on login.
    #[instrument(skip(self))]
    pub async fn add_organization_connection(&self, org_id: &str) -> IdpResult<()> {
        let _: Value = self
            .request(
                Method::POST,
                &format!("/organizations/{org_id}/enabled_connections"),
                Some(json!({
                    "connection_id": self.connection_id,
                    "assign_membership_on_login": true,
                })),
            )
            .await?;
        Ok(())
    }

    /// Detach the configured connection from an organization (compensation).
    #[instrument(skip(self))]
    pub async fn remove_organization_connection(&self, org_id: &str) -> IdpResult<()> {
        self.request_no_body(
            Method::DELETE,
            &format!(
                "/organizations/{org_id}/enabled_connections/{}",
                self.connection_id
            ),
        )
        .await
    }

    /// Invite `email` to the organization, scoped to the application.
    ///
    /// The provider sends the invitation email itself.
    #[instrument(skip(self))]
    pub async fn create_invitation(
        &self,
        org_id: &str,
        client_id: &str,
        email: &str,
    ) -> IdpResult<CreatedInvitation> {
        self.request(
            Method::POST,
            &format!("/organizations/{org_id}/invitations"),
            Some(json!({
                "inviter": { "name": INVITER_NAME },
                "invitee": { "email": email },
                "client_id": client_id,
                "send_invitation_email": true,
            })),
        )
        .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> IdpResult<T> {
        let response = self.send(method, path, body).await?;
        Ok(response.json().await?)
    }

    async fn request_no_body(&self, method: Method, path: &str) -> IdpResult<()> {
        self.send(method, path, None).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> IdpResult<reqwest::Response> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.api_base, path);
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .json::<ApiErrorBody>()
                .await
                .unwrap_or(ApiErrorBody {
                    message: String::new(),
                    error: String::new(),
                });
            return Err(IdpError::Api {
                status,
                message: if body.message.is_empty() {
                    body.error
                } else {
                    body.message
                },
            });
        }
        Ok(response)
    }
}
