//! OAuth client-credentials tokens.

use std::fmt;
use std::time::{Duration, Instant};

use etims_core::remote::RemoteError;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

/// A token is refreshed this long before the vendor says it expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token response carries none.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds; sent as a string by some gateways.
    expires_in: Option<Value>,
}

impl TokenResponse {
    fn lifetime(&self) -> Duration {
        let secs = match &self.expires_in {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        secs.map_or(DEFAULT_LIFETIME, Duration::from_secs)
    }
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    refresh_at: Instant,
}

/// Acquires and caches the bearer token of one consumer.
pub struct TokenSource {
    http: reqwest::Client,
    token_url: String,
    consumer_key: String,
    consumer_secret: String,
    timeout: Duration,
    current: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    /// Creates a source; nothing is requested until [`TokenSource::bearer`].
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout,
            current: Mutex::new(None),
        }
    }

    /// A valid bearer token, fetching a new one when the cached one is stale.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Authentication`] when the token endpoint refuses
    /// the credentials, and a transport error when it cannot be reached.
    pub async fn bearer(&self) -> Result<String, RemoteError> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.value.clone());
        }

        let token = self.fetch().await?;
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }

    /// Drops the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    async fn fetch(&self) -> Result<AccessToken, RemoteError> {
        let response = self
            .http
            .get(&self.token_url)
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.timeout.as_secs())
                } else {
                    RemoteError::Transport(format!("token request: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Authentication(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Authentication(format!("unreadable token response: {e}")))?;

        let lifetime = token.lifetime().saturating_sub(EXPIRY_MARGIN);
        tracing::debug!(lifetime_secs = lifetime.as_secs(), "Acquired eTIMS access token");
        Ok(AccessToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSource")
            .field("token_url", &self.token_url)
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}
