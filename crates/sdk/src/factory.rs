//! Client construction for the core provider.

use std::sync::Arc;

use etims_core::client::{ClientConfig, ClientError, ClientFactory};
use etims_core::remote::EtimsApi;

use crate::client::HttpEtimsClient;

/// Builds [`HttpEtimsClient`]s that share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    http: reqwest::Client,
}

impl HttpClientFactory {
    /// Creates a factory with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Construction`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("etims-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Construction(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Creates a factory on an existing pool.
    #[must_use]
    pub const fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ClientFactory for HttpClientFactory {
    fn connect(&self, config: ClientConfig) -> Result<Arc<dyn EtimsApi>, ClientError> {
        if config.consumer_key.is_empty() || config.consumer_secret.is_empty() {
            return Err(ClientError::Construction(format!(
                "missing consumer credentials for branch {}",
                config.bhf_id
            )));
        }
        Ok(Arc::new(HttpEtimsClient::new(self.http.clone(), &config)))
    }
}
