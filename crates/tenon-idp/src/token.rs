//! Machine-to-machine access token acquisition and caching.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::IdpConfig;
use crate::error::{IdpError, IdpResult};

/// Timeout for the token exchange request.
const TOKEN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Token response from the identity provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// A cached access token with its expiry time.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Caches a Management API access token obtained via client credentials.
///
/// Tokens are refreshed lazily when expired or within the grace period of
/// expiry. A failed exchange leaves the cache untouched.
#[derive(Debug)]
pub struct TokenCache {
    config: IdpConfig,
    token_url: String,
    http: reqwest::Client,
    cached: Arc<RwLock<Option<CachedToken>>>,
    grace_period: Duration,
}

impl TokenCache {
    pub fn new(config: IdpConfig) -> Self {
        let token_url = config.token_url();
        Self::with_token_url(config, token_url)
    }

    /// Construct with an explicit token endpoint, for tests against a local
    /// mock server.
    pub fn with_token_url(config: IdpConfig, token_url: String) -> Self {
        Self {
            config,
            token_url,
            http: reqwest::Client::new(),
            cached: Arc::new(RwLock::new(None)),
            grace_period: Duration::seconds(60),
        }
    }

    /// Get a valid access token, exchanging credentials if necessary.
    #[instrument(skip(self), fields(domain = %self.config.domain))]
    pub async fn get_token(&self) -> IdpResult<String> {
        {
            let cache = self.cached.read().await;
            if let Some(token) = cache.as_ref() {
                if !token.is_expired(self.grace_period) {
                    debug!("Using cached management token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Exchanging machine credentials for management token");
        let token = self.exchange().await?;
        let access_token = token.access_token.clone();
        *self.cached.write().await = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token, forcing a fresh exchange on next use.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn exchange(&self) -> IdpResult<CachedToken> {
        let body = json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret.expose_secret(),
            "audience": self.config.audience(),
            "grant_type": "client_credentials",
        });

        let response = self
            .http
            .post(&self.token_url)
            .timeout(TOKEN_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdpError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(IdpError::Auth(format!(
                "token request rejected with status {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdpError::Auth(format!("invalid token response: {e}")))?;

        Ok(CachedToken {
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            access_token: token.access_token,
        })
    }
}
