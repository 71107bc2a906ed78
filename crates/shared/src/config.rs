//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Vendor integration configuration.
    #[serde(default)]
    pub etims: EtimsConfig,
    /// In-process scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Vendor integration configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EtimsConfig {
    /// Active environment identifier: "Sandbox" or "Production".
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Vendor name used to look up settings records.
    #[serde(default = "default_vendor")]
    pub vendor: String,
    /// Company used by company-less scheduler jobs (notices, code lists).
    #[serde(default)]
    pub default_company: Option<String>,
    /// Per-request HTTP timeout for the vendor client.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    /// Lifetime of a cached authenticated client.
    #[serde(default = "default_client_ttl")]
    pub client_ttl_secs: u64,
    /// Maximum number of cached clients.
    #[serde(default = "default_client_capacity")]
    pub client_cache_capacity: u64,
    /// Wall-clock budget for tasks on the default lane.
    #[serde(default = "default_queue_timeout")]
    pub default_queue_timeout_secs: u64,
    /// Wall-clock budget for tasks on the long lane.
    #[serde(default = "default_long_queue_timeout")]
    pub long_queue_timeout_secs: u64,
}

impl Default for EtimsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            vendor: default_vendor(),
            default_company: None,
            http_timeout_secs: default_http_timeout(),
            client_ttl_secs: default_client_ttl(),
            client_cache_capacity: default_client_capacity(),
            default_queue_timeout_secs: default_queue_timeout(),
            long_queue_timeout_secs: default_long_queue_timeout(),
        }
    }
}

fn default_environment() -> String {
    "Sandbox".to_string()
}

fn default_vendor() -> String {
    "OSCU KRA".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_client_ttl() -> u64 {
    3300 // 55 minutes, under the ~60 minute token
}

fn default_client_capacity() -> u64 {
    256
}

fn default_queue_timeout() -> u64 {
    300
}

fn default_long_queue_timeout() -> u64 {
    1800
}

/// In-process scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether periodic jobs run inside the server process.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,
    /// Interval of the "all" cadence (stock and inventory).
    #[serde(default = "default_all_interval")]
    pub all_interval_secs: u64,
    /// Interval of the hourly cadence.
    #[serde(default = "default_hourly_interval")]
    pub hourly_interval_secs: u64,
    /// Interval of the monthly cadence.
    #[serde(default = "default_monthly_interval")]
    pub monthly_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            all_interval_secs: default_all_interval(),
            hourly_interval_secs: default_hourly_interval(),
            monthly_interval_secs: default_monthly_interval(),
        }
    }
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_all_interval() -> u64 {
    240
}

fn default_hourly_interval() -> u64 {
    3600
}

fn default_monthly_interval() -> u64 {
    2_592_000 // 30 days
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ETIMS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
