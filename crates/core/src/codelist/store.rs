//! Persistence port for mirrored reference data and sync cursors.

use async_trait::async_trait;

use super::types::{CodeCategory, ItemClassification, MirrorKind, MirrorRecord, ReferenceCode};
use crate::store::StoreError;

/// Mirror table storage.
///
/// Upserts are keyed by the vendor code and report how many rows were
/// inserted or actually changed, so replaying identical data reports zero.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Upserts one category inside a single transaction.
    async fn upsert_codes(
        &self,
        category: CodeCategory,
        codes: &[ReferenceCode],
    ) -> Result<u64, StoreError>;

    /// Upserts item classifications inside a single transaction.
    async fn upsert_item_classes(&self, classes: &[ItemClassification]) -> Result<u64, StoreError>;

    /// Upserts search results for a company.
    async fn upsert_records(
        &self,
        kind: MirrorKind,
        company: &str,
        records: &[MirrorRecord],
    ) -> Result<u64, StoreError>;

    /// Rows of one category.
    async fn codes(&self, category: CodeCategory) -> Result<Vec<ReferenceCode>, StoreError>;

    /// Stores the last successful `resultDt` of a route.
    async fn record_cursor(&self, route: &str, last_req_dt: &str) -> Result<(), StoreError>;

    /// Last successful `resultDt` of a route.
    async fn cursor(&self, route: &str) -> Result<Option<String>, StoreError>;
}
