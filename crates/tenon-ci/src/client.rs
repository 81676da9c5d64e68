//! Workflow dispatch client.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, instrument};

use crate::error::{CiError, CiResult};

/// Branch every dispatched workflow runs on.
const DISPATCH_REF: &str = "main";

/// Timeout for the dispatch call.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Public GitHub REST API endpoint.
const DEFAULT_API_BASE: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Configuration for the CI trigger client.
#[derive(Clone)]
pub struct CiConfig {
    /// Personal access token with `workflow` scope.
    pub token: SecretString,
    /// Owner (user or organization) of the target repositories.
    pub owner: String,
}

impl CiConfig {
    pub fn new(token: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            token: token.into().into(),
            owner: owner.into(),
        }
    }
}

impl std::fmt::Debug for CiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiConfig")
            .field("token", &"[REDACTED]")
            .field("owner", &self.owner)
            .finish()
    }
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    #[serde(default)]
    message: String,
}

/// Dispatches workflow runs via the GitHub Actions REST API.
#[derive(Debug, Clone)]
pub struct DispatchClient {
    http: reqwest::Client,
    api_base: String,
    config: CiConfig,
}

impl DispatchClient {
    pub fn new(config: CiConfig) -> Self {
        Self::with_api_base(config, DEFAULT_API_BASE.to_string())
    }

    /// Construct against an explicit API base URL, for tests.
    pub fn with_api_base(config: CiConfig, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            config,
        }
    }

    /// Dispatch `workflow_id` on the `main` branch of the owner's `repo`.
    ///
    /// `inputs` are passed through to the workflow unchanged; `None` sends
    /// an empty input object.
    #[instrument(skip(self, inputs))]
    pub async fn dispatch(
        &self,
        repo: &str,
        workflow_id: &str,
        inputs: Option<Value>,
    ) -> CiResult<()> {
        if self.config.token.expose_secret().is_empty() {
            return Err(CiError::Misconfigured("CI token is not set".into()));
        }
        if self.config.owner.is_empty() {
            return Err(CiError::Misconfigured("CI owner is not set".into()));
        }

        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.api_base, self.config.owner, repo, workflow_id
        );
        let response = self
            .http
            .post(url)
            .timeout(DISPATCH_TIMEOUT)
            .bearer_auth(self.config.token.expose_secret())
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
            .header("user-agent", concat!("tenon/", env!("CARGO_PKG_VERSION")))
            .json(&json!({
                "ref": DISPATCH_REF,
                "inputs": inputs.unwrap_or_else(|| json!({})),
            }))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 204 {
            info!(repo, workflow_id, "Workflow dispatched");
            return Ok(());
        }

        let body = response
            .json::<GitHubErrorBody>()
            .await
            .unwrap_or(GitHubErrorBody {
                message: String::new(),
            });
        Err(CiError::Dispatch {
            status: status.as_u16(),
            message: body.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = CiConfig::new("ghp_secret", "acme");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("acme"));
    }
}
