//! Document store connection configuration.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{DocStoreError, DocStoreResult};

/// Configuration for connecting to a Cosmos DB container.
#[derive(Clone)]
pub struct DocStoreConfig {
    /// Account endpoint, e.g. `https://myaccount.documents.azure.com:443/`.
    pub endpoint: String,
    /// Base64-encoded account master key.
    pub key: SecretString,
    /// Database name.
    pub database: String,
    /// Container name. The container partition key path is `/id`.
    pub container: String,
}

impl DocStoreConfig {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        database: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into().into(),
            database: database.into(),
            container: container.into(),
        }
    }

    /// Validate the configuration, failing fast on values that can never work.
    pub fn validate(&self) -> DocStoreResult<()> {
        if self.endpoint.is_empty() {
            return Err(DocStoreError::Config("endpoint must not be empty".into()));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(DocStoreError::Config(format!(
                "endpoint must be an http(s) URL, got {}",
                self.endpoint
            )));
        }
        if self.key.expose_secret().is_empty() {
            return Err(DocStoreError::Config("master key must not be empty".into()));
        }
        if self.database.is_empty() || self.container.is_empty() {
            return Err(DocStoreError::Config(
                "database and container names must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint with any trailing slash removed, for URL assembly.
    pub(crate) fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

impl std::fmt::Debug for DocStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &"[REDACTED]")
            .field("database", &self.database)
            .field("container", &self.container)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DocStoreConfig {
        DocStoreConfig::new(
            "https://acc.documents.azure.com:443/",
            "a2V5",
            "db",
            "items",
        )
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut config = valid();
        config.endpoint = "ftp://nope".into();
        assert!(matches!(
            config.validate(),
            Err(DocStoreError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_empty_names() {
        let mut config = valid();
        config.container = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", valid());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("a2V5"));
    }

    #[test]
    fn test_base_url_trims_slash() {
        assert_eq!(valid().base_url(), "https://acc.documents.azure.com:443");
    }
}
