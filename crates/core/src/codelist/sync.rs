//! Applying vendor code-list and search responses to the local mirror.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::store::MirrorStore;
use super::types::{CodeCategory, ItemClassification, MirrorKind, MirrorRecord, ReferenceCode};
use crate::remote::RemoteResponse;
use crate::submission::SubmissionError;

/// Rows touched per category by one code-list sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Rows inserted or changed, per mirrored category.
    pub changed: BTreeMap<CodeCategory, u64>,
    /// Class names present in the response but not mirrored.
    pub ignored: Vec<String>,
}

impl SyncReport {
    /// Total rows inserted or changed.
    #[must_use]
    pub fn total_changed(&self) -> u64 {
        self.changed.values().sum()
    }
}

/// Writes vendor reference data into the mirror tables.
#[derive(Clone)]
pub struct CodeListSync {
    mirror: Arc<dyn MirrorStore>,
}

impl CodeListSync {
    /// Creates a synchronizer over `mirror`.
    #[must_use]
    pub fn new(mirror: Arc<dyn MirrorStore>) -> Self {
        Self { mirror }
    }

    /// Applies a `/CodeSearchReq` response.
    ///
    /// Each `clsList` entry is dispatched by `cdClsNm`; every mirrored
    /// category is written in its own transaction.
    pub async fn apply_code_lists(
        &self,
        response: &RemoteResponse,
    ) -> Result<SyncReport, SubmissionError> {
        let mut report = SyncReport::default();

        for class in response.data_list("clsList") {
            let class_name = class.get("cdClsNm").and_then(Value::as_str).unwrap_or_default();
            let Ok(category) = class_name.parse::<CodeCategory>() else {
                report.ignored.push(class_name.to_string());
                continue;
            };

            let codes = class
                .get("dtlList")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|entry| ReferenceCode::from_vendor(category, entry))
                .collect::<Result<Vec<_>, _>>()?;

            let changed = self.mirror.upsert_codes(category, &codes).await?;
            tracing::info!(category = %category, rows = codes.len(), changed, "Synced code list");
            *report.changed.entry(category).or_default() += changed;
        }

        Ok(report)
    }

    /// Applies an `/ItemClsSearchReq` response.
    pub async fn apply_item_classes(&self, response: &RemoteResponse) -> Result<u64, SubmissionError> {
        let classes = response
            .data_list("itemClsList")
            .iter()
            .map(ItemClassification::from_vendor)
            .collect::<Result<Vec<_>, _>>()?;

        let changed = self.mirror.upsert_item_classes(&classes).await?;
        tracing::info!(rows = classes.len(), changed, "Synced item classifications");
        Ok(changed)
    }

    /// Applies a search response to the matching mirror table.
    pub async fn apply_search(
        &self,
        kind: MirrorKind,
        company: &str,
        response: &RemoteResponse,
    ) -> Result<u64, SubmissionError> {
        let records = response
            .data_list(kind.list_key())
            .iter()
            .map(|row| MirrorRecord::from_vendor(kind, row))
            .collect::<Result<Vec<_>, _>>()?;

        let changed = self.mirror.upsert_records(kind, company, &records).await?;
        tracing::info!(table = kind.as_str(), rows = records.len(), changed, "Mirrored search results");
        Ok(changed)
    }

    /// Stores the response's `resultDt` as the route's cursor, when present.
    pub async fn record_cursor(&self, route: &str, response: &RemoteResponse) -> Result<(), SubmissionError> {
        if let Some(result_dt) = response.result_dt() {
            self.mirror.record_cursor(route, result_dt).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CodeListSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeListSync").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
