//! OAuth2 client-credentials authentication for Microsoft Graph.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// OAuth2 token response from the login endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached OAuth2 access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace
    /// period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Token cache for the client-credentials flow.
///
/// The collector makes one Graph call per user, so on a large tenant the
/// token has to refresh mid-run; callers fetch through [`get_token`] every
/// request and the cache refreshes transparently.
///
/// [`get_token`]: TokenCache::get_token
#[derive(Debug)]
pub struct TokenCache {
    client_id: String,
    client_secret: SecretString,
    tenant_id: String,
    login_endpoint: String,
    graph_endpoint: String,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl TokenCache {
    /// Creates a new token cache.
    pub fn new(
        client_id: String,
        client_secret: SecretString,
        tenant_id: String,
        login_endpoint: String,
        graph_endpoint: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            tenant_id,
            login_endpoint,
            graph_endpoint,
            http_client: reqwest::Client::new(),
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Gets a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> ReportResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Refreshing access token");
        let new_token = self.acquire_token().await?;

        let access_token = new_token.access_token.clone();
        {
            let mut cache = self.cached_token.write().await;
            *cache = Some(new_token);
        }

        Ok(access_token)
    }

    /// Acquires a new access token using the client-credentials flow.
    async fn acquire_token(&self) -> ReportResult<CachedToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_endpoint, self.tenant_id
        );

        let scope = format!("{}/.default", self.graph_endpoint);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", &scope),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ReportError::Auth(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Auth(format!(
                "Token request failed with status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Auth(format!("Failed to parse token response: {}", e)))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(%expires_at, "Acquired new access token");

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
