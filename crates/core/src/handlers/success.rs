//! Success-path write-backs, one per operation family.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::codelist::{CodeListSync, MirrorKind, SyncReport};
use crate::remote::RemoteResponse;
use crate::submission::{DocumentKind, DocumentStore, SubmissionError, SubmissionFlag};

/// Vendor field holding the sequence number a sale was submitted under.
pub const SUBMISSION_SEQUENCE_FIELD: &str = "submission_sequence_number";

/// Response fields of `/TrnsSalesSaveWrReq` and where they are stored.
const SALES_RECEIPT_FIELDS: [(&str, &str); 7] = [
    ("rcptNo", "receipt_number"),
    ("totRcptNo", "total_receipt_number"),
    ("intrlData", "internal_data"),
    ("rcptSign", "receipt_signature"),
    ("vsdcRcptPbctDate", "control_unit_time"),
    ("sdcId", "scu_id"),
    ("mrcNo", "mrc_no"),
];

/// Persists what the vendor returned and flips submission flags.
///
/// Every write is an upsert or a merge, so replaying a handler is harmless.
#[derive(Clone)]
pub struct SuccessHandlers {
    documents: Arc<dyn DocumentStore>,
    sync: CodeListSync,
}

impl SuccessHandlers {
    /// Creates the handler set.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, sync: CodeListSync) -> Self {
        Self { documents, sync }
    }

    /// Sales and POS invoices: receipt identifiers, then the flag.
    pub async fn sales_invoice(
        &self,
        kind: DocumentKind,
        name: &str,
        invoice_no: u64,
        response: &RemoteResponse,
    ) -> Result<(), SubmissionError> {
        let mut fields = Map::new();
        fields.insert("invoice_number".to_string(), json!(invoice_no));
        fields.insert(SUBMISSION_SEQUENCE_FIELD.to_string(), json!(invoice_no));
        for (from, to) in SALES_RECEIPT_FIELDS {
            if let Some(value) = response.data_field(from).filter(|v| !v.is_null()) {
                fields.insert(to.to_string(), value.clone());
            }
        }

        self.documents
            .mark_submitted(kind, name, SubmissionFlag::Submitted, fields)
            .await?;
        tracing::info!(doctype = %kind, document = name, invoice_no, "Sales invoice accepted");
        Ok(())
    }

    /// Documents whose only write-back is the flag.
    pub async fn submitted(&self, kind: DocumentKind, name: &str) -> Result<(), SubmissionError> {
        self.documents
            .mark_submitted(kind, name, SubmissionFlag::Submitted, Map::new())
            .await?;
        tracing::info!(doctype = %kind, document = name, "Document accepted");
        Ok(())
    }

    /// Stock master: the entry's residual quantity was accepted.
    pub async fn inventory(&self, entry: &str) -> Result<(), SubmissionError> {
        self.documents
            .mark_submitted(
                DocumentKind::StockLedgerEntry,
                entry,
                SubmissionFlag::InventorySubmitted,
                Map::new(),
            )
            .await?;
        tracing::info!(document = entry, "Inventory accepted");
        Ok(())
    }

    /// Customer lookup: stores the first matching taxpayer.
    pub async fn customer_details(
        &self,
        customer: &str,
        response: &RemoteResponse,
    ) -> Result<(), SubmissionError> {
        let found = response.data_list("custList").first().cloned();
        let mut fields = Map::new();
        fields.insert("customer_verified".to_string(), Value::Bool(found.is_some()));
        fields.insert("etims_customer".to_string(), found.unwrap_or(Value::Null));

        self.documents
            .merge_vendor_fields(DocumentKind::Customer, customer, fields)
            .await?;
        Ok(())
    }

    /// Sets a boolean vendor field on a record.
    pub async fn flag(&self, kind: DocumentKind, name: &str, field: &str) -> Result<(), SubmissionError> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), Value::Bool(true));
        self.documents.merge_vendor_fields(kind, name, fields).await?;
        Ok(())
    }

    /// Search results into their mirror table.
    pub async fn search(
        &self,
        kind: MirrorKind,
        company: &str,
        response: &RemoteResponse,
    ) -> Result<u64, SubmissionError> {
        self.sync.apply_search(kind, company, response).await
    }

    /// Code lists into the reference tables.
    pub async fn code_lists(&self, response: &RemoteResponse) -> Result<SyncReport, SubmissionError> {
        self.sync.apply_code_lists(response).await
    }

    /// Item classifications into their table.
    pub async fn item_classes(&self, response: &RemoteResponse) -> Result<u64, SubmissionError> {
        self.sync.apply_item_classes(response).await
    }

    /// Marks the route's last successful sync.
    pub async fn cursor(&self, route: &str, response: &RemoteResponse) -> Result<(), SubmissionError> {
        self.sync.record_cursor(route, response).await
    }
}

impl std::fmt::Debug for SuccessHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuccessHandlers").finish_non_exhaustive()
    }
}
