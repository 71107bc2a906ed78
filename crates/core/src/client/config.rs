//! Resolved client configuration and the cached handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::remote::EtimsApi;
use crate::settings::{Environment, EtimsSettings};

/// Cache key: one client per tenant, vendor and branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    /// Company.
    pub company: String,
    /// Vendor name.
    pub vendor: String,
    /// Branch id.
    pub branch: String,
}

impl ClientKey {
    /// Creates a key.
    #[must_use]
    pub fn new(company: impl Into<String>, vendor: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            vendor: vendor.into(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "etims_client:{}:{}:{}", self.company, self.vendor, self.branch)
    }
}

/// Everything a client needs to authenticate and address one branch.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Environment selector.
    pub environment: Environment,
    /// OAuth token endpoint.
    pub token_url: String,
    /// API base URL.
    pub api_base_url: String,
    /// OAuth client id.
    pub consumer_key: String,
    /// OAuth client secret.
    pub consumer_secret: String,
    /// Taxpayer PIN.
    pub tin: String,
    /// Branch id.
    pub bhf_id: String,
    /// Device serial number.
    pub device_serial: Option<String>,
    /// Communication key from OSCU initialization; empty before it.
    pub cmc_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration for a settings record.
    #[must_use]
    pub fn from_settings(settings: &EtimsSettings, timeout: Duration) -> Self {
        Self {
            environment: settings.environment,
            token_url: settings.environment.token_url().to_string(),
            api_base_url: settings.environment.api_base_url().to_string(),
            consumer_key: settings.consumer_key.clone(),
            consumer_secret: settings.consumer_secret.clone(),
            tin: settings.tin.clone(),
            bhf_id: settings.bhfid.clone(),
            device_serial: settings.dvc_srl_no.clone(),
            cmc_key: settings.communication_key.clone().unwrap_or_default(),
            timeout,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("tin", &self.tin)
            .field("bhf_id", &self.bhf_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A ready client bound to its configuration.
#[derive(Clone)]
pub struct ClientHandle {
    /// Key the handle is cached under.
    pub key: ClientKey,
    /// Configuration the client was built from.
    pub config: Arc<ClientConfig>,
    /// The client.
    pub api: Arc<dyn EtimsApi>,
}

impl ClientHandle {
    /// Environment key (`sbx` or `prod`) for audit URLs.
    #[must_use]
    pub fn env_key(&self) -> &'static str {
        self.config.environment.key()
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("key", &self.key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
