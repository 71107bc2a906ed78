//! Resolving a ready client for a tenant branch.

use std::sync::Arc;
use std::time::Duration;

use super::cache::ClientCache;
use super::config::{ClientConfig, ClientHandle, ClientKey};
use super::error::ClientError;
use crate::remote::EtimsApi;
use crate::settings::{Environment, EtimsSettings, SettingsStore};

/// Builds clients from configuration. Implemented by the HTTP SDK.
pub trait ClientFactory: Send + Sync {
    /// Constructs a client. Tokens are acquired lazily on first use.
    fn connect(&self, config: ClientConfig) -> Result<Arc<dyn EtimsApi>, ClientError>;
}

/// Cache-fronted client lookup.
#[derive(Clone)]
pub struct ClientProvider {
    settings: Arc<dyn SettingsStore>,
    factory: Arc<dyn ClientFactory>,
    cache: Arc<dyn ClientCache>,
    environment: Environment,
    timeout: Duration,
}

impl ClientProvider {
    /// Creates a provider for the process's configured environment.
    #[must_use]
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        factory: Arc<dyn ClientFactory>,
        cache: Arc<dyn ClientCache>,
        environment: Environment,
        timeout: Duration,
    ) -> Self {
        Self {
            settings,
            factory,
            cache,
            environment,
            timeout,
        }
    }

    /// Environment clients are resolved for.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the cached client for the branch, building one on a miss.
    ///
    /// Fails with [`ClientError::Configuration`] when the branch has no
    /// active settings in the current environment.
    pub async fn get_client(
        &self,
        company: &str,
        vendor: &str,
        branch: &str,
    ) -> Result<ClientHandle, ClientError> {
        let key = ClientKey::new(company, vendor, branch);
        if let Some(handle) = self.cache.get(&key) {
            return Ok(handle);
        }

        let settings = self
            .settings
            .find_active(company, vendor, self.environment, branch)
            .await?
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "no active eTIMS settings for company {company}, branch {branch}, environment {}",
                    self.environment
                ))
            })?;

        let handle = self.connect(key, &settings)?;
        tracing::debug!(client = %handle.key, "Cached new eTIMS client");
        self.cache.insert(handle.clone());
        Ok(handle)
    }

    /// An uncached client for `settings`, used before they are persisted.
    pub fn connect_uncached(&self, settings: &EtimsSettings) -> Result<ClientHandle, ClientError> {
        let key = ClientKey::new(&settings.company, &settings.vendor, &settings.bhfid);
        self.connect(key, settings)
    }

    fn connect(&self, key: ClientKey, settings: &EtimsSettings) -> Result<ClientHandle, ClientError> {
        let config = ClientConfig::from_settings(settings, self.timeout);
        let api = self.factory.connect(config.clone())?;
        Ok(ClientHandle {
            key,
            config: Arc::new(config),
            api,
        })
    }

    /// Drops the cached client of a settings record.
    pub fn invalidate(&self, settings: &EtimsSettings) {
        self.cache
            .invalidate(&ClientKey::new(&settings.company, &settings.vendor, &settings.bhfid));
    }
}

impl std::fmt::Debug for ClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientProvider")
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
