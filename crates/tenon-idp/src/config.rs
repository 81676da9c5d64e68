//! Identity provider connection configuration.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{IdpError, IdpResult};

/// Configuration for the Auth0 Management API.
#[derive(Clone)]
pub struct IdpConfig {
    /// Auth0 tenant domain, e.g. `dev-abc123.auth0.com`.
    pub domain: String,
    /// Machine-to-machine application client id.
    pub client_id: String,
    /// Machine-to-machine application client secret.
    pub client_secret: SecretString,
    /// Pre-configured connection attached to newly created organizations.
    pub connection_id: String,
}

impl IdpConfig {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        connection_id: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into().into(),
            connection_id: connection_id.into(),
        }
    }

    pub fn validate(&self) -> IdpResult<()> {
        if self.domain.is_empty() {
            return Err(IdpError::Config("domain must not be empty".into()));
        }
        if self.client_id.is_empty() || self.client_secret.expose_secret().is_empty() {
            return Err(IdpError::Config(
                "machine credentials must not be empty".into(),
            ));
        }
        if self.connection_id.is_empty() {
            return Err(IdpError::Config("connection_id must not be empty".into()));
        }
        Ok(())
    }

    /// Token endpoint URL derived from the domain.
    pub(crate) fn token_url(&self) -> String {
        format!("https://{}/oauth/token", self.domain)
    }

    /// Token audience for the Management API.
    pub(crate) fn audience(&self) -> String {
        format!("https://{}/api/v2/", self.domain)
    }

    /// Management API base URL derived from the domain.
    pub(crate) fn api_base(&self) -> String {
        format!("https://{}/api/v2", self.domain)
    }
}

impl std::fmt::Debug for IdpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdpConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("connection_id", &self.connection_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_derive_from_domain() {
        let config = IdpConfig::new("dev-abc.auth0.com", "cid", "secret", "con_1");
        assert_eq!(config.token_url(), "https://dev-abc.auth0.com/oauth/token");
        assert_eq!(config.audience(), "https://dev-abc.auth0.com/api/v2/");
        assert_eq!(config.api_base(), "https://dev-abc.auth0.com/api/v2");
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let config = IdpConfig::new("dev-abc.auth0.com", "", "secret", "con_1");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = IdpConfig::new("dev-abc.auth0.com", "cid", "hunter2", "con_1");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
