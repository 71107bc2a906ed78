//! Mirrored ERP documents and the ports the pipeline reads them through.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::SubmissionError;
use crate::payload::{ItemSnapshot, TaxRates, WarehouseBranches};
use crate::store::StoreError;

/// `docstatus` of a submitted (finalized) document.
pub const DOCSTATUS_SUBMITTED: i16 = 1;
/// `docstatus` of a cancelled document.
pub const DOCSTATUS_CANCELLED: i16 = 2;

/// Kinds of ERP records the bridge mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DocumentKind {
    SalesInvoice,
    PosInvoice,
    PurchaseInvoice,
    StockLedgerEntry,
    Item,
    StockEntry,
    StockReconciliation,
    PurchaseReceipt,
    DeliveryNote,
    Customer,
    BranchUser,
    BillOfMaterials,
}

impl DocumentKind {
    /// Every kind.
    pub const ALL: [Self; 12] = [
        Self::SalesInvoice,
        Self::PosInvoice,
        Self::PurchaseInvoice,
        Self::StockLedgerEntry,
        Self::Item,
        Self::StockEntry,
        Self::StockReconciliation,
        Self::PurchaseReceipt,
        Self::DeliveryNote,
        Self::Customer,
        Self::BranchUser,
        Self::BillOfMaterials,
    ];

    /// ERP doctype name.
    #[must_use]
    pub const fn doctype(&self) -> &'static str {
        match self {
            Self::SalesInvoice => "Sales Invoice",
            Self::PosInvoice => "POS Invoice",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::StockLedgerEntry => "Stock Ledger Entry",
            Self::Item => "Item",
            Self::StockEntry => "Stock Entry",
            Self::StockReconciliation => "Stock Reconciliation",
            Self::PurchaseReceipt => "Purchase Receipt",
            Self::DeliveryNote => "Delivery Note",
            Self::Customer => "Customer",
            Self::BranchUser => "eTIMS User",
            Self::BillOfMaterials => "BOM",
        }
    }

    /// URL path segment.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::SalesInvoice => "sales-invoice",
            Self::PosInvoice => "pos-invoice",
            Self::PurchaseInvoice => "purchase-invoice",
            Self::StockLedgerEntry => "stock-ledger-entry",
            Self::Item => "item",
            Self::StockEntry => "stock-entry",
            Self::StockReconciliation => "stock-reconciliation",
            Self::PurchaseReceipt => "purchase-receipt",
            Self::DeliveryNote => "delivery-note",
            Self::Customer => "customer",
            Self::BranchUser => "branch-user",
            Self::BillOfMaterials => "bom",
        }
    }

    /// Kind of the voucher a stock ledger entry points at.
    #[must_use]
    pub fn from_voucher_type(voucher_type: &str) -> Option<Self> {
        match voucher_type {
            "Stock Entry" => Some(Self::StockEntry),
            "Stock Reconciliation" => Some(Self::StockReconciliation),
            "Purchase Receipt" => Some(Self::PurchaseReceipt),
            "Purchase Invoice" => Some(Self::PurchaseInvoice),
            "Delivery Note" => Some(Self::DeliveryNote),
            "Sales Invoice" => Some(Self::SalesInvoice),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doctype())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    /// Accepts the doctype name or the URL slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.doctype().eq_ignore_ascii_case(s) || kind.slug() == s)
            .ok_or_else(|| format!("Unknown document kind: {s}"))
    }
}

/// A mirrored ERP record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Kind.
    pub kind: DocumentKind,
    /// ERP name.
    pub name: String,
    /// Owning company.
    pub company: String,
    /// 0 draft, 1 submitted, 2 cancelled.
    pub docstatus: i16,
    /// Accepted by the vendor.
    pub submitted: bool,
    /// Stock ledger entries only: residual quantity reported.
    pub inventory_submitted: bool,
    /// The ERP snapshot.
    pub body: Value,
    /// Vendor-assigned fields written back on success.
    pub vendor_fields: Value,
    /// Last write.
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Deserializes the snapshot.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, SubmissionError> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            SubmissionError::Validation(format!("{} {} is malformed: {e}", self.kind, self.name))
        })
    }

    /// A vendor field, when written back.
    #[must_use]
    pub fn vendor_field(&self, key: &str) -> Option<&Value> {
        self.vendor_fields.get(key)
    }

    /// True when the vendor field holds `true`.
    #[must_use]
    pub fn vendor_flag(&self, key: &str) -> bool {
        self.vendor_field(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The item master view: the snapshot with flags from the mirror.
    pub fn item_snapshot(&self) -> Result<ItemSnapshot, SubmissionError> {
        let mut item: ItemSnapshot = self.parse()?;
        item.registered = self.submitted;
        if let Some(code) = self.vendor_field("etims_item_code").and_then(Value::as_str) {
            item.etims_item_code = Some(code.to_string());
        }
        item.imported_item_submitted |= self.vendor_flag("imported_item_submitted");
        Ok(item)
    }
}

/// Which completion flag a write-back sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFlag {
    /// The document itself was accepted.
    Submitted,
    /// The residual quantity of a stock ledger entry was accepted.
    InventorySubmitted,
}

/// Access to mirrored ERP documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Document by kind and name.
    async fn load(&self, kind: DocumentKind, name: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Inserts or replaces the snapshot, keeping flags and vendor fields.
    async fn upsert(
        &self,
        kind: DocumentKind,
        name: &str,
        company: &str,
        docstatus: i16,
        body: Value,
    ) -> Result<StoredDocument, StoreError>;

    /// Names of finalized documents of `kind` not yet accepted.
    async fn pending(&self, kind: DocumentKind) -> Result<Vec<String>, StoreError>;

    /// Names of accepted stock ledger entries whose residual quantity is not.
    async fn pending_inventory(&self) -> Result<Vec<String>, StoreError>;

    /// The subset of `names` that is finalized and not yet accepted.
    async fn filter_eligible(
        &self,
        kind: DocumentKind,
        names: &[String],
    ) -> Result<Vec<String>, StoreError>;

    /// Merges `fields` into the vendor fields and sets `flag`, atomically.
    async fn mark_submitted(
        &self,
        kind: DocumentKind,
        name: &str,
        flag: SubmissionFlag,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Merges `fields` into the vendor fields without touching flags.
    async fn merge_vendor_fields(
        &self,
        kind: DocumentKind,
        name: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Highest eTIMS item code suffix used for a classification.
    async fn max_item_code_suffix(&self, classification: &str) -> Result<Option<u32>, StoreError>;
}

/// Reference data the builders need.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Rate per taxation type, from the mirrored code list.
    async fn taxation_rates(&self) -> Result<TaxRates, StoreError>;

    /// Branch of each named warehouse. Unknown warehouses are omitted.
    async fn warehouse_branches(&self, warehouses: &[String]) -> Result<WarehouseBranches, StoreError>;
}
