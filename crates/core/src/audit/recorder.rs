//! Opening and finalizing audit records.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::types::{AuditStatus, NewAuditRecord};
use crate::store::StoreError;

/// Persistence port for audit records.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Inserts a `Pending` record.
    async fn open(&self, record: NewAuditRecord) -> Result<(), StoreError>;

    /// Moves a record to a terminal status.
    async fn finalize(
        &self,
        id: Uuid,
        status: AuditStatus,
        output: Option<String>,
        error: Option<String>,
    ) -> Result<(), StoreError>;
}

/// The open record of one attempt, shared by the task and its watcher.
///
/// Whoever takes the id finalizes the record; later takers see `None`.
#[derive(Debug, Clone, Default)]
pub struct AuditSlot(Arc<Mutex<Option<Uuid>>>);

impl AuditSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, id: Uuid) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    /// Takes the id, leaving the slot empty.
    pub fn take(&self) -> Option<Uuid> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Returns the id without taking it.
    #[must_use]
    pub fn peek(&self) -> Option<Uuid> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writes audit records through an [`AuditTrail`].
#[derive(Clone)]
pub struct AuditRecorder {
    trail: Arc<dyn AuditTrail>,
}

impl AuditRecorder {
    /// Creates a recorder over `trail`.
    #[must_use]
    pub fn new(trail: Arc<dyn AuditTrail>) -> Self {
        Self { trail }
    }

    /// Opens a `Pending` record and parks its id in `slot`.
    ///
    /// The id is parked before the insert so a timeout racing the insert
    /// still finds it.
    pub async fn open(&self, slot: &AuditSlot, record: NewAuditRecord) -> Result<Uuid, StoreError> {
        let id = record.id;
        slot.put(id);
        if let Err(e) = self.trail.open(record).await {
            slot.take();
            return Err(e);
        }
        tracing::debug!(audit_id = %id, "Opened integration request");
        Ok(id)
    }

    /// Marks the slot's record `Completed`. No-op once the slot is empty.
    pub async fn complete(&self, slot: &AuditSlot, output: Option<String>) {
        self.finish(slot, AuditStatus::Completed, output, None).await;
    }

    /// Marks the slot's record `Failed`. No-op once the slot is empty.
    pub async fn fail(&self, slot: &AuditSlot, error: impl Into<String>) {
        self.finish(slot, AuditStatus::Failed, None, Some(error.into()))
            .await;
    }

    async fn finish(
        &self,
        slot: &AuditSlot,
        status: AuditStatus,
        output: Option<String>,
        error: Option<String>,
    ) {
        let Some(id) = slot.take() else {
            return;
        };
        if let Err(e) = self.trail.finalize(id, status, output, error).await {
            tracing::error!(audit_id = %id, status = %status, error = %e, "Failed to finalize integration request");
        }
    }
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Operation;
    use crate::testing::MemoryAuditTrail;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_finalized_once() {
        let trail = Arc::new(MemoryAuditTrail::default());
        let recorder = AuditRecorder::new(trail.clone());
        let slot = AuditSlot::new();

        let record = NewAuditRecord::new("sbx", Operation::SaveItem, json!({"itemCd": "X"}));
        let id = recorder.open(&slot, record).await.unwrap();
        assert_eq!(trail.status(id), Some(AuditStatus::Pending));

        recorder.complete(&slot, Some("ok".to_string())).await;
        recorder.fail(&slot, "late timeout").await;

        assert_eq!(trail.status(id), Some(AuditStatus::Completed));
        assert_eq!(trail.finalize_count(id), 1);
    }

    #[tokio::test]
    async fn test_url_names_sdk_method() {
        let record = NewAuditRecord::new("prod", Operation::SaveSales, json!({}));
        assert_eq!(record.url, "SDK:prod:save_transaction_sales_osdc");
    }

    #[tokio::test]
    async fn test_fail_on_empty_slot_is_noop() {
        let trail = Arc::new(MemoryAuditTrail::default());
        let recorder = AuditRecorder::new(trail.clone());
        recorder.fail(&AuditSlot::new(), "nothing open").await;
        assert!(trail.is_empty());
    }
}
