//! Application configuration loaded from environment variables.
//!
//! Loading is fail-fast: values that can never work (unparseable port,
//! malformed endpoint) abort startup with a clear message. Connection
//! settings for the three external services fall back to documented
//! development-only defaults; every fallback is logged at WARN, and in
//! production mode (`APP_ENV=production`) any insecure default in use
//! refuses startup instead.

use std::env;
use thiserror::Error;

use tenon_ci::CiConfig;
use tenon_docstore::DocStoreConfig;
use tenon_idp::IdpConfig;

// ── Insecure development defaults ─────────────────────────────────────────
// Deployment hazard: these let the server start locally without any real
// credentials. Production mode rejects them.

pub const DEFAULT_COSMOS_URL: &str = "https://dummy.documents.azure.com:443/";
/// Base64 of a throwaway key so local runs fail at the network, not at decode.
pub const DEFAULT_COSMOS_KEY: &str = "ZHVtbXktY29zbW9zLWtleQ==";
pub const DEFAULT_DATABASE_NAME: &str = "testdb";
pub const DEFAULT_CONTAINER_NAME: &str = "testcontainer";
pub const DEFAULT_AUTH0_DOMAIN: &str = "dev-abc123.auth0.com";
pub const DEFAULT_AUTH0_CLIENT_ID: &str = "dummy_client_id";
pub const DEFAULT_AUTH0_CLIENT_SECRET: &str = "dummy_client_secret";
pub const DEFAULT_AUTH0_CONNECTION_ID: &str = "con_123456";
pub const DEFAULT_GITHUB_PAT: &str = "ghp_dummyPAT";
pub const DEFAULT_GITHUB_OWNER: &str = "dummy-owner";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error(
        "Refusing to start in production with insecure default(s): {}",
        vars.join(", ")
    )]
    InsecureDefaults { vars: Vec<&'static str> },
}

/// Application environment mode.
///
/// Development allows insecure defaults (with WARN logging); production
/// refuses startup when any is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` value; unset or unrecognized means
    /// development.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" | "" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Full application configuration, constructed once at startup and injected
/// into handlers via state; no global mutable configuration exists.
#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub app_env: AppEnvironment,
    /// Allowed CORS origins; `*` means any.
    pub cors_allowed_origins: Vec<String>,
    pub docstore: DocStoreConfig,
    pub idp: IdpConfig,
    pub ci: CiConfig,
    /// Names of environment variables that fell back to insecure defaults.
    pub insecure_defaults: Vec<&'static str>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut insecure = Vec::new();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                message: e.to_string(),
            })?,
            Err(_) => 5000,
        };
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info,tenon=debug".to_string());
        let app_env =
            AppEnvironment::from_env_str(&env::var("APP_ENV").unwrap_or_default());
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let docstore = DocStoreConfig::new(
            defaulted("COSMOS_DB_URL", DEFAULT_COSMOS_URL, &mut insecure),
            defaulted("COSMOS_DB_KEY", DEFAULT_COSMOS_KEY, &mut insecure),
            defaulted("DATABASE_NAME", DEFAULT_DATABASE_NAME, &mut insecure),
            defaulted("CONTAINER_NAME", DEFAULT_CONTAINER_NAME, &mut insecure),
        );
        let idp = IdpConfig::new(
            defaulted("AUTH0_DOMAIN", DEFAULT_AUTH0_DOMAIN, &mut insecure),
            defaulted("AUTH0_M2M_CLIENT_ID", DEFAULT_AUTH0_CLIENT_ID, &mut insecure),
            defaulted(
                "AUTH0_M2M_CLIENT_SECRET",
                DEFAULT_AUTH0_CLIENT_SECRET,
                &mut insecure,
            ),
            defaulted(
                "AUTH0_CONNECTION_ID",
                DEFAULT_AUTH0_CONNECTION_ID,
                &mut insecure,
            ),
        );
        let ci = CiConfig::new(
            defaulted("GITHUB_PAT", DEFAULT_GITHUB_PAT, &mut insecure),
            defaulted("GITHUB_OWNER", DEFAULT_GITHUB_OWNER, &mut insecure),
        );

        Ok(Self {
            host,
            port,
            rust_log,
            app_env,
            cors_allowed_origins,
            docstore,
            idp,
            ci,
            insecure_defaults: insecure,
        })
    }

    /// Enforce the production policy on insecure defaults.
    pub fn validate_security_config(&self) -> Result<(), ConfigError> {
        if self.insecure_defaults.is_empty() {
            return Ok(());
        }
        if self.app_env.is_production() {
            return Err(ConfigError::InsecureDefaults {
                vars: self.insecure_defaults.clone(),
            });
        }
        for var in &self.insecure_defaults {
            tracing::warn!(var, "Using insecure development default");
        }
        Ok(())
    }
}

/// Read a variable, falling back to its development default and recording
/// the fallback.
fn defaulted(var: &'static str, default: &str, insecure: &mut Vec<&'static str>) -> String {
    match env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            insecure.push(var);
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("PROD"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str(""),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("staging"),
            AppEnvironment::Development
        );
    }

    fn config_with(app_env: AppEnvironment, insecure: Vec<&'static str>) -> Config {
        Config {
            host: "0.0.0.0".into(),
            port: 5000,
            rust_log: "info".into(),
            app_env,
            cors_allowed_origins: vec!["*".into()],
            docstore: DocStoreConfig::new(
                DEFAULT_COSMOS_URL,
                DEFAULT_COSMOS_KEY,
                DEFAULT_DATABASE_NAME,
                DEFAULT_CONTAINER_NAME,
            ),
            idp: IdpConfig::new(
                DEFAULT_AUTH0_DOMAIN,
                DEFAULT_AUTH0_CLIENT_ID,
                DEFAULT_AUTH0_CLIENT_SECRET,
                DEFAULT_AUTH0_CONNECTION_ID,
            ),
            ci: CiConfig::new(DEFAULT_GITHUB_PAT, DEFAULT_GITHUB_OWNER),
            insecure_defaults: insecure,
        }
    }

    #[test]
    fn test_production_refuses_insecure_defaults() {
        let config = config_with(AppEnvironment::Production, vec!["COSMOS_DB_KEY"]);
        assert!(matches!(
            config.validate_security_config(),
            Err(ConfigError::InsecureDefaults { .. })
        ));
    }

    #[test]
    fn test_development_tolerates_insecure_defaults() {
        let config = config_with(AppEnvironment::Development, vec!["COSMOS_DB_KEY"]);
        assert!(config.validate_security_config().is_ok());
    }

    #[test]
    fn test_production_with_real_values_passes() {
        let config = config_with(AppEnvironment::Production, Vec::new());
        assert!(config.validate_security_config().is_ok());
    }
}
