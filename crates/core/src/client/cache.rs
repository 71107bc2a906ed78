//! Client caching using Moka.
//!
//! Entries expire before the vendor's hour-long access token does, so a
//! cached client never carries a stale token.

use std::time::Duration;

use moka::sync::Cache;

use super::config::{ClientHandle, ClientKey};

/// Default cache capacity (number of branches).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Default time-to-live (55 minutes).
const DEFAULT_TTL_SECS: u64 = 3300;

/// Injected client cache.
pub trait ClientCache: Send + Sync {
    /// Cached handle for `key`, if fresh.
    fn get(&self, key: &ClientKey) -> Option<ClientHandle>;

    /// Stores or replaces the handle under its key.
    fn insert(&self, handle: ClientHandle);

    /// Drops one entry.
    fn invalidate(&self, key: &ClientKey);

    /// Drops every entry.
    fn invalidate_all(&self);
}

/// Moka-backed [`ClientCache`] with a fixed time-to-live.
#[derive(Clone)]
pub struct MokaClientCache {
    cache: Cache<ClientKey, ClientHandle>,
}

impl MokaClientCache {
    /// Creates a cache with default settings: 256 entries, 55 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts reflect recent writes.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for MokaClientCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCache for MokaClientCache {
    fn get(&self, key: &ClientKey) -> Option<ClientHandle> {
        self.cache.get(key)
    }

    fn insert(&self, handle: ClientHandle) {
        self.cache.insert(handle.key.clone(), handle);
    }

    fn invalidate(&self, key: &ClientKey) {
        self.cache.invalidate(key);
    }

    fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::ClientConfig;
    use crate::settings::Environment;
    use crate::testing::ScriptedApi;

    fn handle(branch: &str) -> ClientHandle {
        ClientHandle {
            key: ClientKey::new("Acme", "OSCU KRA", branch),
            config: Arc::new(ClientConfig {
                environment: Environment::Sandbox,
                token_url: Environment::Sandbox.token_url().to_string(),
                api_base_url: Environment::Sandbox.api_base_url().to_string(),
                consumer_key: "k".to_string(),
                consumer_secret: "s".to_string(),
                tin: "P051234567X".to_string(),
                bhf_id: branch.to_string(),
                device_serial: None,
                cmc_key: String::new(),
                timeout: Duration::from_secs(30),
            }),
            api: Arc::new(ScriptedApi::default()),
        }
    }

    #[test]
    fn test_entries_are_scoped_per_key() {
        let cache = MokaClientCache::new();
        cache.insert(handle("00"));
        cache.insert(handle("01"));
        cache.run_pending_tasks();

        assert_eq!(cache.entry_count(), 2);
        let hit = cache.get(&ClientKey::new("Acme", "OSCU KRA", "01")).unwrap();
        assert_eq!(hit.config.bhf_id, "01");
        assert!(cache.get(&ClientKey::new("Other", "OSCU KRA", "00")).is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = MokaClientCache::new();
        cache.insert(handle("00"));
        cache.insert(handle("01"));

        cache.invalidate(&ClientKey::new("Acme", "OSCU KRA", "00"));
        assert!(cache.get(&ClientKey::new("Acme", "OSCU KRA", "00")).is_none());

        cache.invalidate_all();
        assert!(cache.get(&ClientKey::new("Acme", "OSCU KRA", "01")).is_none());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            ClientKey::new("Acme", "OSCU KRA", "00").to_string(),
            "etims_client:Acme:OSCU KRA:00"
        );
    }

    #[test]
    fn test_expired_entries_are_not_returned() {
        let cache = MokaClientCache::with_config(10, 1);
        cache.insert(handle("00"));
        std::thread::sleep(Duration::from_millis(1100));
        assert!(cache.get(&ClientKey::new("Acme", "OSCU KRA", "00")).is_none());
    }
}
