//! Concrete attempt steps: a typed vendor request plus its write-back.

use async_trait::async_trait;
use serde_json::Value;

use crate::codelist::MirrorKind;
use crate::handlers::SuccessHandlers;
use crate::payload::PayloadError;
use crate::payload::registry::redacted_snapshot;
use crate::payload::wire::{
    BranchCustomerPayload, BranchUserPayload, CompositionPayload, CustomerSearchRequest,
    ImportedItemUpdatePayload, InsurancePayload, ItemPayload, LastRequestQuery, PurchasePayload,
    SalesPayload, StockMasterPayload, StockMovementPayload,
};
use crate::remote::{EtimsApi, Operation, RemoteError, RemoteResponse};
use crate::submission::{DocumentKind, Reference, Step, SubmissionError};

/// A built request body, one variant per vendor method.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum Request {
    Sales(SalesPayload),
    Purchase(PurchasePayload),
    StockMovement(StockMovementPayload),
    StockMaster(StockMasterPayload),
    Item(ItemPayload),
    CustomerSearch(CustomerSearchRequest),
    Insurance(InsurancePayload),
    BranchCustomer(BranchCustomerPayload),
    BranchUser(BranchUserPayload),
    ImportedItemUpdate(ImportedItemUpdatePayload),
    ImportedItems(LastRequestQuery),
    Notices(LastRequestQuery),
    StockMovements(LastRequestQuery),
    Branches(LastRequestQuery),
    CodeLists(LastRequestQuery),
    ItemClasses(LastRequestQuery),
}

impl Request {
    /// Operation the request is sent to.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Sales(_) => Operation::SaveSales,
            Self::Purchase(_) => Operation::SavePurchase,
            Self::StockMovement(_) => Operation::SaveStockMovement,
            Self::StockMaster(_) => Operation::SaveStockMaster,
            Self::Item(_) => Operation::SaveItem,
            Self::CustomerSearch(_) => Operation::SearchCustomer,
            Self::Insurance(_) => Operation::SaveBranchInsurance,
            Self::BranchCustomer(_) => Operation::SaveBranchCustomer,
            Self::BranchUser(_) => Operation::SaveBranchUser,
            Self::ImportedItemUpdate(_) => Operation::UpdateImportedItem,
            Self::ImportedItems(_) => Operation::SearchImportedItems,
            Self::Notices(_) => Operation::SearchNotices,
            Self::StockMovements(_) => Operation::SearchStockMovements,
            Self::Branches(_) => Operation::SearchBranches,
            Self::CodeLists(_) => Operation::SearchCodeLists,
            Self::ItemClasses(_) => Operation::SearchItemClassifications,
        }
    }

    /// Audit snapshot. The branch user password is masked.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let encoded = match self {
            Self::Sales(p) => serde_json::to_value(p),
            Self::Purchase(p) => serde_json::to_value(p),
            Self::StockMovement(p) => serde_json::to_value(p),
            Self::StockMaster(p) => serde_json::to_value(p),
            Self::Item(p) => serde_json::to_value(p),
            Self::CustomerSearch(p) => serde_json::to_value(p),
            Self::Insurance(p) => serde_json::to_value(p),
            Self::BranchCustomer(p) => serde_json::to_value(p),
            Self::BranchUser(p) => return redacted_snapshot(p),
            Self::ImportedItemUpdate(p) => serde_json::to_value(p),
            Self::ImportedItems(q)
            | Self::Notices(q)
            | Self::StockMovements(q)
            | Self::Branches(q)
            | Self::CodeLists(q)
            | Self::ItemClasses(q) => serde_json::to_value(q),
        };
        encoded.unwrap_or(Value::Null)
    }

    /// Sends the request through the matching client method.
    pub async fn send(&self, api: &dyn EtimsApi) -> Result<RemoteResponse, RemoteError> {
        match self {
            Self::Sales(p) => api.save_transaction_sales_osdc(p).await,
            Self::Purchase(p) => api.save_purchase(p).await,
            Self::StockMovement(p) => api.save_stock_movement(p).await,
            Self::StockMaster(p) => api.save_stock_master(p).await,
            Self::Item(p) => api.save_item(p).await,
            Self::CustomerSearch(p) => api.select_customer(p).await,
            Self::Insurance(p) => api.save_branch_insurance(p).await,
            Self::BranchCustomer(p) => api.save_branch_customer(p).await,
            Self::BranchUser(p) => api.save_branch_user(p).await,
            Self::ImportedItemUpdate(p) => api.update_imported_item(p).await,
            Self::ImportedItems(q) => api.select_imported_items(q).await,
            Self::Notices(q) => api.select_notice_list(q).await,
            Self::StockMovements(q) => api.select_stock_movements(q).await,
            Self::Branches(q) => api.select_branches(q).await,
            Self::CodeLists(q) => api.select_code_list(q).await,
            Self::ItemClasses(q) => api.select_item_classes(q).await,
        }
    }
}

/// What a successful attempt persists.
#[derive(Debug, Clone)]
pub enum WriteBack {
    /// Receipt identifiers and the submitted flag of a sale.
    SalesInvoice {
        /// Sales or POS invoice.
        kind: DocumentKind,
        /// Document name.
        name: String,
    },
    /// The submitted flag only.
    Submitted {
        /// Kind.
        kind: DocumentKind,
        /// Document name.
        name: String,
    },
    /// The inventory flag of a stock ledger entry.
    Inventory {
        /// Ledger entry name.
        entry: String,
    },
    /// The matched taxpayer of a customer lookup.
    CustomerDetails {
        /// Customer name.
        customer: String,
    },
    /// A boolean vendor field.
    Flag {
        /// Kind.
        kind: DocumentKind,
        /// Record name.
        name: String,
        /// Field set to `true`.
        field: &'static str,
    },
    /// Search results into a mirror table.
    Search {
        /// Mirror table.
        kind: MirrorKind,
        /// Tenant the results belong to.
        company: String,
    },
    /// Code lists into the reference tables.
    CodeLists,
    /// Item classifications.
    ItemClasses,
}

impl WriteBack {
    fn reference(&self) -> Reference {
        match self {
            Self::SalesInvoice { kind, name }
            | Self::Submitted { kind, name }
            | Self::Flag { kind, name, .. } => Reference::document(*kind, name.clone()),
            Self::Inventory { entry } => Reference::document(DocumentKind::StockLedgerEntry, entry.clone()),
            Self::CustomerDetails { customer } => Reference::document(DocumentKind::Customer, customer.clone()),
            Self::Search { .. } | Self::CodeLists | Self::ItemClasses => Reference::none(),
        }
    }
}

/// One vendor call with its write-back.
///
/// The request is built before the step is dispatched; a build failure is
/// carried along and surfaces from [`Step::call`] so it is audited.
pub struct VendorStep {
    operation: Operation,
    scope: String,
    request: Result<Request, PayloadError>,
    fallback_snapshot: Value,
    write_back: WriteBack,
    handlers: SuccessHandlers,
}

impl VendorStep {
    /// A step for `operation`, scoped to one client.
    ///
    /// `fallback_snapshot` is audited when the request could not be built.
    #[must_use]
    pub fn new(
        operation: Operation,
        scope: impl Into<String>,
        request: Result<Request, PayloadError>,
        fallback_snapshot: Value,
        write_back: WriteBack,
        handlers: SuccessHandlers,
    ) -> Self {
        Self {
            operation,
            scope: scope.into(),
            request,
            fallback_snapshot,
            write_back,
            handlers,
        }
    }
}

#[async_trait]
impl Step for VendorStep {
    fn operation(&self) -> Operation {
        self.operation
    }

    fn reference(&self) -> Reference {
        self.write_back.reference()
    }

    fn snapshot(&self) -> Value {
        match &self.request {
            Ok(request) => request.snapshot(),
            Err(_) => self.fallback_snapshot.clone(),
        }
    }

    fn flight_key(&self) -> Option<String> {
        let reference = self.reference();
        Some(format!(
            "{}:{}:{}:{}",
            self.operation,
            self.scope,
            reference.doctype.as_deref().unwrap_or("-"),
            reference.name.as_deref().unwrap_or("-")
        ))
    }

    async fn call(&self, api: &dyn EtimsApi) -> Result<RemoteResponse, SubmissionError> {
        let request = self.request.as_ref().map_err(|e| SubmissionError::from(e.clone()))?;
        Ok(request.send(api).await?)
    }

    async fn succeed(&self, response: &RemoteResponse) -> Result<(), SubmissionError> {
        match &self.write_back {
            WriteBack::SalesInvoice { kind, name } => {
                let Ok(Request::Sales(payload)) = &self.request else {
                    return Err(SubmissionError::DataIntegrity(format!(
                        "{kind} {name} was sent without a sales payload"
                    )));
                };
                self.handlers
                    .sales_invoice(*kind, name, payload.invc_no, response)
                    .await
            }
            WriteBack::Submitted { kind, name } => self.handlers.submitted(*kind, name).await,
            WriteBack::Inventory { entry } => self.handlers.inventory(entry).await,
            WriteBack::CustomerDetails { customer } => {
                self.handlers.customer_details(customer, response).await
            }
            WriteBack::Flag { kind, name, field } => self.handlers.flag(*kind, name, field).await,
            WriteBack::Search { kind, company } => {
                let changed = self.handlers.search(*kind, company, response).await?;
                tracing::info!(mirror = kind.as_str(), company = %company, changed, "Mirrored search results");
                Ok(())
            }
            WriteBack::CodeLists => {
                let report = self.handlers.code_lists(response).await?;
                tracing::info!(changed = report.total_changed(), ignored = ?report.ignored, "Refreshed code lists");
                Ok(())
            }
            WriteBack::ItemClasses => {
                let changed = self.handlers.item_classes(response).await?;
                tracing::info!(changed, "Refreshed item classifications");
                Ok(())
            }
        }
    }
}

/// A bill of materials: one call per component under one audit record.
pub struct CompositionStep {
    bom: String,
    payloads: Result<Vec<CompositionPayload>, PayloadError>,
    handlers: SuccessHandlers,
}

/// Vendor field set on a bill of materials once every component is accepted.
pub const COMPOSITION_SUBMITTED_FIELD: &str = "composition_submitted";

impl CompositionStep {
    /// A step for the bill of materials `bom`.
    #[must_use]
    pub fn new(
        bom: impl Into<String>,
        payloads: Result<Vec<CompositionPayload>, PayloadError>,
        handlers: SuccessHandlers,
    ) -> Self {
        Self {
            bom: bom.into(),
            payloads,
            handlers,
        }
    }
}

#[async_trait]
impl Step for CompositionStep {
    fn operation(&self) -> Operation {
        Operation::SaveItemComposition
    }

    fn reference(&self) -> Reference {
        Reference::document(DocumentKind::BillOfMaterials, self.bom.clone())
    }

    fn snapshot(&self) -> Value {
        match &self.payloads {
            Ok(payloads) => serde_json::to_value(payloads).unwrap_or(Value::Null),
            Err(_) => Value::Null,
        }
    }

    async fn call(&self, api: &dyn EtimsApi) -> Result<RemoteResponse, SubmissionError> {
        let payloads = self.payloads.as_ref().map_err(|e| SubmissionError::from(e.clone()))?;
        for payload in payloads {
            let response = api.save_item_composition(payload).await?;
            if !response.is_success() {
                return Ok(response);
            }
        }
        Ok(RemoteResponse::success(format!(
            "{} components accepted",
            payloads.len()
        )))
    }

    async fn succeed(&self, _response: &RemoteResponse) -> Result<(), SubmissionError> {
        self.handlers
            .flag(DocumentKind::BillOfMaterials, &self.bom, COMPOSITION_SUBMITTED_FIELD)
            .await
    }
}
