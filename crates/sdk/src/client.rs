//! The per-branch HTTP client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use etims_core::client::ClientConfig;
use etims_core::remote::{EtimsApi, Operation, RemoteError, RemoteResponse};
use reqwest::StatusCode;
use serde_json::Value;

use crate::auth::TokenSource;

/// Posts payloads for one taxpayer branch.
///
/// Every request carries the bearer token plus the `tin`, `bhfId` and
/// `cmcKey` headers identifying the OSCU device.
pub struct HttpEtimsClient {
    http: reqwest::Client,
    base_url: String,
    tin: String,
    bhf_id: String,
    cmc_key: String,
    timeout: Duration,
    auth: Arc<TokenSource>,
}

impl HttpEtimsClient {
    /// Builds a client for `config` on a shared connection pool.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        let auth = TokenSource::new(
            http.clone(),
            config.token_url.clone(),
            config.consumer_key.clone(),
            config.consumer_secret.clone(),
            config.timeout,
        );
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tin: config.tin.clone(),
            bhf_id: config.bhf_id.clone(),
            cmc_key: config.cmc_key.clone(),
            timeout: config.timeout,
            auth: Arc::new(auth),
        }
    }

    async fn post(&self, url: &str, body: &Value) -> Result<reqwest::Response, RemoteError> {
        let token = self.auth.bearer().await?;
        self.http
            .post(url)
            .bearer_auth(token)
            .header("tin", &self.tin)
            .header("bhfId", &self.bhf_id)
            .header("cmcKey", &self.cmc_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.timeout.as_secs())
                } else {
                    RemoteError::Transport(e.to_string())
                }
            })
    }
}

#[async_trait]
impl EtimsApi for HttpEtimsClient {
    async fn call(&self, operation: Operation, body: Value) -> Result<RemoteResponse, RemoteError> {
        let url = format!("{}{}", self.base_url, operation.route());
        tracing::debug!(route = operation.route(), branch = %self.bhf_id, "Calling eTIMS");

        let mut response = self.post(&url, &body).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // The gateway revoked the token early; one fresh token, one more try.
            self.auth.invalidate().await;
            response = self.post(&url, &body).await?;
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("reading response: {e}")))?;

        // Rejections often come back with a 4xx status and a normal envelope.
        match serde_json::from_str::<Value>(&text) {
            Ok(envelope) if envelope.get("resultCd").is_some() => RemoteResponse::from_envelope(envelope),
            _ if !status.is_success() => Err(RemoteError::Transport(format!("HTTP {status}: {text}"))),
            Ok(_) => Err(RemoteError::Malformed("missing resultCd".to_string())),
            Err(e) => Err(RemoteError::Malformed(format!("not JSON: {e}"))),
        }
    }
}

impl fmt::Debug for HttpEtimsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEtimsClient")
            .field("base_url", &self.base_url)
            .field("tin", &self.tin)
            .field("bhf_id", &self.bhf_id)
            .finish_non_exhaustive()
    }
}
