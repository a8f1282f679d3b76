//! Reddit OAuth2 password-grant authentication

use reddit_research_domain::PlatformError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Environment-sourced credentials for the bot account
pub struct RedditCredentials {
    pub client_id: SecretString,
    pub client_secret: SecretString,
    pub username: SecretString,
    pub password: SecretString,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Fetches and caches OAuth2 bearer tokens via the password grant
pub(crate) struct TokenSource {
    client: Client,
    credentials: RedditCredentials,
    auth_base_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub(crate) fn new(
        client: Client,
        credentials: RedditCredentials,
        auth_base_url: String,
    ) -> Self {
        Self {
            client,
            credentials,
            auth_base_url,
            cached: Mutex::new(None),
        }
    }

    pub(crate) async fn access_token(&self) -> Result<String, PlatformError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, PlatformError> {
        let params = [
            ("grant_type", "password"),
            ("username", self.credentials.username.expose_secret()),
            ("password", self.credentials.password.expose_secret()),
        ];

        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base_url))
            .basic_auth(
                self.credentials.client_id.expose_secret(),
                Some(self.credentials.client_secret.expose_secret()),
            )
            .form(&params)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        if response.status() == 401 {
            return Err(PlatformError::Auth("Invalid client credentials".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Auth(format!(
                "Token request returned {status}: {body}"
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Api(format!("Failed to parse token response: {e}")))?;

        tracing::debug!(expires_in = token.expires_in, "Fetched Reddit access token");

        // refresh a minute before the reported expiry
        let ttl = Duration::from_secs(token.expires_in.saturating_sub(60).max(1));
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + ttl,
        })
    }
}
