//! Persistence port for settings.

use async_trait::async_trait;
use uuid::Uuid;

use super::types::{Environment, EtimsSettings};
use crate::store::StoreError;

/// Settings storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Record by id.
    async fn get(&self, id: Uuid) -> Result<Option<EtimsSettings>, StoreError>;

    /// The active record for a tenant branch, if any.
    async fn find_active(
        &self,
        company: &str,
        vendor: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<Option<EtimsSettings>, StoreError>;

    /// Inserts a new record as given.
    async fn insert(&self, settings: &EtimsSettings) -> Result<(), StoreError>;

    /// Overwrites an existing record.
    async fn update(&self, settings: &EtimsSettings) -> Result<(), StoreError>;

    /// Marks `id` active and demotes every other active record with the same
    /// company, environment and branch, atomically.
    async fn activate(&self, id: Uuid) -> Result<(), StoreError>;

    /// Active records for a company, environment and branch.
    async fn count_active(
        &self,
        company: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<u64, StoreError>;

    /// Every active record, across tenants.
    async fn list_active(&self) -> Result<Vec<EtimsSettings>, StoreError>;

    /// Every record, optionally for one company.
    async fn list(&self, company: Option<&str>) -> Result<Vec<EtimsSettings>, StoreError>;
}
