//! The bridge's entry points: ERP events, manual triggers and sweeps.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value, json};

use super::steps::{CompositionStep, Request, VendorStep, WriteBack};
use crate::audit::{AuditRecorder, AuditTrail};
use crate::client::{ClientHandle, ClientProvider};
use crate::codelist::{CodeListSync, MirrorKind, MirrorStore};
use crate::handlers::{ErrorHandler, ErrorLog, SUBMISSION_SEQUENCE_FIELD, SuccessHandlers};
use crate::payload::registry::{
    BRANCH_SEARCH_SINCE, CODE_LIST_SINCE, ITEM_CLASS_SINCE, generate_password, last_request_date,
    lookback,
};
use crate::payload::wire::LastRequestQuery;
use crate::payload::{
    BranchCustomerRegistration, BranchUserRegistration, CompositionRequest, CustomerLookup,
    ImportedItemUpdate, InsuranceRegistration, InvoiceSnapshot, ItemIndex, PayloadError,
    PurchaseSnapshot, StockLedgerEntry, StockMovementInput, StockVoucher, assign_item_code,
    build_composition_payloads, build_item_payload, build_purchase_payload, build_sales_payload,
    build_stock_master_payload, build_stock_movement_payload,
};
use crate::remote::{LaneBudgets, Operation, RemoteResponse};
use crate::settings::{EtimsSettings, SettingsStore};
use crate::submission::precondition::{self, Gate};
use crate::submission::{
    AttemptRunner, DOCSTATUS_CANCELLED, DOCSTATUS_SUBMITTED, Dispatch, Dispatcher, DocumentKind,
    DocumentStore, ReferenceData, Step, StoredDocument, SubmissionError,
};
use crate::sweep::{SweepReport, run_sweep};

/// Branch used when a document carries none.
pub const HEAD_OFFICE_BRANCH: &str = "00";

/// Vendor field set once an insurer registration is accepted.
pub const INSURANCE_SUBMITTED_FIELD: &str = "insurance_submitted";
/// Vendor field set once a branch customer registration is accepted.
pub const BRANCH_CUSTOMER_SUBMITTED_FIELD: &str = "branch_customer_submitted";
/// Vendor field set once a branch user registration is accepted.
pub const BRANCH_USER_SUBMITTED_FIELD: &str = "branch_user_submitted";
/// Vendor field set once an imported item update is accepted.
pub const IMPORTED_ITEM_SUBMITTED_FIELD: &str = "imported_item_submitted";
/// Vendor field holding the generated eTIMS item code.
pub const ITEM_CODE_FIELD: &str = "etims_item_code";

/// Storage the service works against.
#[derive(Clone)]
pub struct EtimsPorts {
    /// Settings records.
    pub settings: Arc<dyn SettingsStore>,
    /// Mirrored ERP documents.
    pub documents: Arc<dyn DocumentStore>,
    /// Taxation rates and warehouse branches.
    pub reference: Arc<dyn ReferenceData>,
    /// Code lists, search results and cursors.
    pub mirror: Arc<dyn MirrorStore>,
    /// Integration request audit trail.
    pub audit: Arc<dyn AuditTrail>,
    /// Categorized error log.
    pub errors: Arc<dyn ErrorLog>,
}

/// A branch user registration in flight, with the password generated for it.
///
/// The password is returned once and never stored.
#[derive(Debug)]
pub struct BranchUserTicket {
    /// The enqueued attempt.
    pub dispatch: Dispatch,
    /// Generated password.
    pub password: String,
}

/// Submission pipeline over a set of ports.
#[derive(Clone)]
pub struct EtimsService {
    vendor: String,
    default_company: Option<String>,
    clients: ClientProvider,
    settings: Arc<dyn SettingsStore>,
    documents: Arc<dyn DocumentStore>,
    reference: Arc<dyn ReferenceData>,
    handlers: SuccessHandlers,
    dispatcher: Dispatcher,
}

impl EtimsService {
    /// Wires the pipeline for `vendor`.
    #[must_use]
    pub fn new(
        ports: EtimsPorts,
        clients: ClientProvider,
        budgets: LaneBudgets,
        vendor: impl Into<String>,
    ) -> Self {
        let handlers = SuccessHandlers::new(ports.documents.clone(), CodeListSync::new(ports.mirror));
        let runner = AttemptRunner::new(
            AuditRecorder::new(ports.audit),
            ErrorHandler::new(ports.errors),
            handlers.clone(),
        );
        Self {
            vendor: vendor.into(),
            default_company: None,
            clients,
            settings: ports.settings,
            documents: ports.documents,
            reference: ports.reference,
            handlers,
            dispatcher: Dispatcher::new(runner, budgets),
        }
    }

    /// Company assumed for documents that do not name one.
    #[must_use]
    pub fn with_default_company(mut self, company: Option<String>) -> Self {
        self.default_company = company.filter(|c| !c.trim().is_empty());
        self
    }

    /// The task dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // -- ERP events ---------------------------------------------------------

    /// Mirrors an ERP lifecycle event and triggers the document's submission.
    ///
    /// Items get their eTIMS code assigned before registration. Vouchers
    /// that only feed stock movements are mirrored without a trigger.
    pub async fn handle_event(&self, kind: DocumentKind, body: Value) -> Result<Dispatch, SubmissionError> {
        let name = text_field(&body, "name")
            .ok_or_else(|| SubmissionError::Validation(format!("{kind} event without a name")))?;
        let company = text_field(&body, "company")
            .or_else(|| self.default_company.clone())
            .ok_or_else(|| SubmissionError::Validation(format!("{kind} {name} has no company")))?;
        let docstatus = if kind == DocumentKind::Item {
            DOCSTATUS_SUBMITTED
        } else {
            body.get("docstatus")
                .and_then(Value::as_i64)
                .and_then(|s| i16::try_from(s).ok())
                .unwrap_or_default()
        };

        let stored = self.documents.upsert(kind, &name, &company, docstatus, body).await?;
        tracing::debug!(doctype = %kind, document = %name, docstatus, "Mirrored ERP document");

        match kind {
            DocumentKind::SalesInvoice | DocumentKind::PosInvoice => {
                self.submit_sales_invoice(kind, &name).await
            }
            DocumentKind::PurchaseInvoice => self.submit_purchase_invoice(&name).await,
            DocumentKind::StockLedgerEntry => self.submit_stock_movement(&name).await,
            DocumentKind::Item => {
                self.assign_item_code(&stored).await?;
                self.register_item(&name).await
            }
            _ => Ok(Dispatch::Skipped("mirrored only".to_string())),
        }
    }

    /// Refuses to cancel an accepted invoice; otherwise marks it cancelled.
    pub async fn cancel(&self, kind: DocumentKind, name: &str) -> Result<(), SubmissionError> {
        let doc = self.require(kind, name).await?;
        precondition::before_cancel(kind, doc.submitted)?;
        self.documents
            .upsert(kind, name, &doc.company, DOCSTATUS_CANCELLED, doc.body)
            .await?;
        tracing::info!(doctype = %kind, document = name, "Document cancelled");
        Ok(())
    }

    /// Submits any supported document kind by name.
    pub async fn submit(&self, kind: DocumentKind, name: &str) -> Result<Dispatch, SubmissionError> {
        match kind {
            DocumentKind::SalesInvoice | DocumentKind::PosInvoice => {
                self.submit_sales_invoice(kind, name).await
            }
            DocumentKind::PurchaseInvoice => self.submit_purchase_invoice(name).await,
            DocumentKind::StockLedgerEntry => self.submit_stock_movement(name).await,
            DocumentKind::Item => self.register_item(name).await,
            other => Err(SubmissionError::Validation(format!(
                "{other} documents are not submitted directly"
            ))),
        }
    }

    /// Submits the eligible subset of `names`.
    pub async fn bulk_submit(&self, kind: DocumentKind, names: &[String]) -> Result<SweepReport, SubmissionError> {
        let eligible = self.documents.filter_eligible(kind, names).await?;
        let job = format!("bulk-{}", kind.slug());
        Ok(run_sweep(&job, eligible, |name| async move { self.submit(kind, &name).await }).await)
    }

    // -- Transactions ---------------------------------------------------------

    /// Sales and POS invoices, including credit notes.
    pub async fn submit_sales_invoice(&self, kind: DocumentKind, name: &str) -> Result<Dispatch, SubmissionError> {
        let doc = self.require(kind, name).await?;
        if doc.submitted {
            return Ok(Dispatch::AlreadySubmitted);
        }
        if doc.docstatus != DOCSTATUS_SUBMITTED {
            return Ok(Dispatch::Skipped("document is not finalized".to_string()));
        }
        let invoice: InvoiceSnapshot = doc.parse()?;
        if let Gate::Skip(reason) = precondition::sales_invoice(&invoice)? {
            return Ok(Dispatch::Skipped(reason));
        }

        let branch = invoice.branch.as_deref().unwrap_or(HEAD_OFFICE_BRANCH);
        let client = self.client(&doc.company, branch).await?;
        let rates = self.reference.taxation_rates().await?;
        let original_no = if invoice.is_return {
            self.original_sequence(kind, invoice.return_against.as_deref()).await?
        } else {
            None
        };

        let request = build_sales_payload(&invoice, &rates, original_no).map(Request::Sales);
        Ok(self.enqueue(
            &client,
            Operation::SaveSales,
            request,
            doc.body,
            WriteBack::SalesInvoice {
                kind,
                name: name.to_string(),
            },
        ))
    }

    async fn original_sequence(
        &self,
        kind: DocumentKind,
        return_against: Option<&str>,
    ) -> Result<Option<u64>, SubmissionError> {
        let Some(original) = return_against else {
            return Ok(None);
        };
        Ok(self
            .documents
            .load(kind, original)
            .await?
            .and_then(|doc| doc.vendor_field(SUBMISSION_SEQUENCE_FIELD).and_then(Value::as_u64)))
    }

    /// Purchase invoices.
    pub async fn submit_purchase_invoice(&self, name: &str) -> Result<Dispatch, SubmissionError> {
        let kind = DocumentKind::PurchaseInvoice;
        let doc = self.require(kind, name).await?;
        if doc.submitted {
            return Ok(Dispatch::AlreadySubmitted);
        }
        if doc.docstatus != DOCSTATUS_SUBMITTED {
            return Ok(Dispatch::Skipped("document is not finalized".to_string()));
        }
        let purchase: PurchaseSnapshot = doc.parse()?;
        let codes: Vec<String> = purchase.items.iter().map(|l| l.item_code.clone()).collect();
        let items = self.item_index(&codes).await?;
        if let Gate::Skip(reason) = precondition::purchase_invoice(&purchase, &items)? {
            return Ok(Dispatch::Skipped(reason));
        }

        let branch = purchase.branch.as_deref().unwrap_or(HEAD_OFFICE_BRANCH);
        let client = self.client(&doc.company, branch).await?;
        let rates = self.reference.taxation_rates().await?;
        let request = build_purchase_payload(&purchase, &rates).map(Request::Purchase);
        Ok(self.enqueue(
            &client,
            Operation::SavePurchase,
            request,
            doc.body,
            WriteBack::Submitted {
                kind,
                name: name.to_string(),
            },
        ))
    }

    /// The stock movement of one ledger entry.
    pub async fn submit_stock_movement(&self, name: &str) -> Result<Dispatch, SubmissionError> {
        let doc = self.require(DocumentKind::StockLedgerEntry, name).await?;
        if doc.submitted {
            return Ok(Dispatch::AlreadySubmitted);
        }
        let entry: StockLedgerEntry = doc.parse()?;
        let voucher_kind = DocumentKind::from_voucher_type(&entry.voucher_type);
        let voucher_doc = match voucher_kind {
            Some(kind) => self.documents.load(kind, &entry.voucher_no).await?,
            None => None,
        };
        let sales_voucher_submitted = (voucher_kind == Some(DocumentKind::SalesInvoice))
            .then(|| voucher_doc.as_ref().is_some_and(|v| v.submitted));
        if let Gate::Skip(reason) = precondition::stock_ledger_entry(&entry, sales_voucher_submitted)? {
            return Ok(Dispatch::Skipped(reason));
        }

        if voucher_kind.is_none() {
            return Err(SubmissionError::Format(format!(
                "unsupported voucher type '{}' on {name}",
                entry.voucher_type
            )));
        }
        let voucher = match voucher_doc {
            Some(voucher_doc) => {
                let mut voucher: StockVoucher = voucher_doc.parse()?;
                voucher.submitted = voucher_doc.submitted;
                Some(voucher)
            }
            None => None,
        };

        let items = self.item_index(std::slice::from_ref(&entry.item_code)).await?;
        let warehouses: Vec<String> = std::iter::once(entry.warehouse.clone())
            .chain(
                voucher
                    .iter()
                    .flat_map(|v| v.items.iter())
                    .flat_map(|line| [line.s_warehouse.clone(), line.t_warehouse.clone()])
                    .flatten(),
            )
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let branches = self.reference.warehouse_branches(&warehouses).await?;

        let branch = branches
            .get(&entry.warehouse)
            .map_or(HEAD_OFFICE_BRANCH, String::as_str);
        let client = self.client(&doc.company, branch).await?;
        // A voucher that was never mirrored fails inside the attempt.
        let request = match &voucher {
            Some(voucher) => build_stock_movement_payload(StockMovementInput {
                entry: &entry,
                voucher,
                items: &items,
                branches: &branches,
            })
            .map(Request::StockMovement),
            None => Err(PayloadError::DataIntegrity(format!(
                "{} {} referenced by {name} is not mirrored",
                entry.voucher_type, entry.voucher_no
            ))),
        };

        Ok(self.enqueue(
            &client,
            Operation::SaveStockMovement,
            request,
            doc.body,
            WriteBack::Submitted {
                kind: DocumentKind::StockLedgerEntry,
                name: name.to_string(),
            },
        ))
    }

    /// The residual quantity after one accepted ledger entry.
    pub async fn submit_inventory(&self, name: &str) -> Result<Dispatch, SubmissionError> {
        let doc = self.require(DocumentKind::StockLedgerEntry, name).await?;
        if doc.inventory_submitted {
            return Ok(Dispatch::AlreadySubmitted);
        }
        if !doc.submitted {
            return Ok(Dispatch::Skipped("stock movement not accepted yet".to_string()));
        }
        let entry: StockLedgerEntry = doc.parse()?;
        let items = self.item_index(std::slice::from_ref(&entry.item_code)).await?;
        let branches = self
            .reference
            .warehouse_branches(std::slice::from_ref(&entry.warehouse))
            .await?;

        let branch = branches
            .get(&entry.warehouse)
            .map_or(HEAD_OFFICE_BRANCH, String::as_str);
        let client = self.client(&doc.company, branch).await?;
        let request = match items.get(&entry.item_code) {
            Some(item) => build_stock_master_payload(&entry, item),
            None => Err(PayloadError::DataIntegrity(format!(
                "item {} of {name} is not mirrored",
                entry.item_code
            ))),
        }
        .map(Request::StockMaster);

        Ok(self.enqueue(
            &client,
            Operation::SaveStockMaster,
            request,
            doc.body,
            WriteBack::Inventory {
                entry: name.to_string(),
            },
        ))
    }

    // -- Items ----------------------------------------------------------------

    async fn assign_item_code(&self, doc: &StoredDocument) -> Result<(), SubmissionError> {
        let item = doc.item_snapshot()?;
        let Some(classification) = item.item_classification.as_deref() else {
            return Ok(());
        };
        let highest = self.documents.max_item_code_suffix(classification).await?;
        let Some(code) = assign_item_code(&item, highest) else {
            tracing::debug!(item = %doc.name, "Item code prefix incomplete");
            return Ok(());
        };
        if item.etims_item_code.as_deref() == Some(code.as_str()) {
            return Ok(());
        }

        let mut fields = Map::new();
        fields.insert(ITEM_CODE_FIELD.to_string(), Value::String(code.clone()));
        self.documents
            .merge_vendor_fields(DocumentKind::Item, &doc.name, fields)
            .await?;
        tracing::info!(item = %doc.name, code, "Assigned eTIMS item code");
        Ok(())
    }

    /// Registers an item master record.
    pub async fn register_item(&self, name: &str) -> Result<Dispatch, SubmissionError> {
        let doc = self.require(DocumentKind::Item, name).await?;
        if doc.submitted {
            return Ok(Dispatch::AlreadySubmitted);
        }
        let item = doc.item_snapshot()?;
        if item.etims_item_code.is_none() {
            return Ok(Dispatch::Skipped(
                "origin, product type and units are needed for an item code".to_string(),
            ));
        }

        let client = self.client(&doc.company, HEAD_OFFICE_BRANCH).await?;
        let request = build_item_payload(&item).map(Request::Item);
        Ok(self.enqueue(
            &client,
            Operation::SaveItem,
            request,
            doc.body,
            WriteBack::Submitted {
                kind: DocumentKind::Item,
                name: name.to_string(),
            },
        ))
    }

    /// Submits a bill of materials, one call per component.
    ///
    /// The manufactured item and every component must be registered first.
    pub async fn submit_composition(&self, request: CompositionRequest) -> Result<Dispatch, SubmissionError> {
        let codes: Vec<String> = std::iter::once(request.item.clone())
            .chain(request.items.iter().map(|c| c.item_code.clone()))
            .collect();
        let items = self.item_index(&codes).await?;
        if let Some(missing) = codes
            .iter()
            .find(|code| !items.get(*code).is_some_and(|item| item.registered))
        {
            return Err(SubmissionError::Validation(format!(
                "item {missing} must be registered with eTIMS before its composition"
            )));
        }
        if request.items.is_empty() {
            return Err(SubmissionError::Validation(format!(
                "bill of materials {} has no components",
                request.name
            )));
        }

        let body = serde_json::to_value(&request).unwrap_or(Value::Null);
        self.documents
            .upsert(
                DocumentKind::BillOfMaterials,
                &request.name,
                &request.company,
                DOCSTATUS_SUBMITTED,
                body,
            )
            .await?;

        let client = self.client(&request.company, HEAD_OFFICE_BRANCH).await?;
        let payloads = build_composition_payloads(&request, &items);
        let step = CompositionStep::new(request.name, payloads, self.handlers.clone());
        Ok(self.dispatcher.dispatch(Arc::new(step), client))
    }

    // -- Branch registry --------------------------------------------------------

    /// Looks a customer PIN up and stores the match on the customer.
    pub async fn search_customer(&self, lookup: CustomerLookup) -> Result<Dispatch, SubmissionError> {
        self.require(DocumentKind::Customer, &lookup.name).await?;
        let client = self.client(&lookup.company, &lookup.branch_id).await?;
        let request = Request::CustomerSearch(lookup.payload());
        Ok(self.enqueue(
            &client,
            Operation::SearchCustomer,
            Ok(request),
            Value::Null,
            WriteBack::CustomerDetails {
                customer: lookup.name,
            },
        ))
    }

    /// Registers an insurer for the branch.
    pub async fn register_insurance(&self, registration: InsuranceRegistration) -> Result<Dispatch, SubmissionError> {
        self.require(DocumentKind::Customer, &registration.name).await?;
        let client = self.client(&registration.company, &registration.branch_id).await?;
        Ok(self.enqueue(
            &client,
            Operation::SaveBranchInsurance,
            Ok(Request::Insurance(registration.payload())),
            Value::Null,
            WriteBack::Flag {
                kind: DocumentKind::Customer,
                name: registration.name,
                field: INSURANCE_SUBMITTED_FIELD,
            },
        ))
    }

    /// Registers a customer with the branch.
    pub async fn register_branch_customer(
        &self,
        registration: BranchCustomerRegistration,
    ) -> Result<Dispatch, SubmissionError> {
        self.require(DocumentKind::Customer, &registration.name).await?;
        let client = self.client(&registration.company, &registration.branch_id).await?;
        Ok(self.enqueue(
            &client,
            Operation::SaveBranchCustomer,
            Ok(Request::BranchCustomer(registration.payload())),
            Value::Null,
            WriteBack::Flag {
                kind: DocumentKind::Customer,
                name: registration.name,
                field: BRANCH_CUSTOMER_SUBMITTED_FIELD,
            },
        ))
    }

    /// Registers a branch user under a freshly generated password.
    ///
    /// The registration is mirrored without the password.
    pub async fn register_branch_user(
        &self,
        registration: BranchUserRegistration,
    ) -> Result<BranchUserTicket, SubmissionError> {
        let client = self.client(&registration.company, &registration.branch_id).await?;
        let body = serde_json::to_value(&registration).unwrap_or(Value::Null);
        self.documents
            .upsert(
                DocumentKind::BranchUser,
                &registration.name,
                &registration.company,
                DOCSTATUS_SUBMITTED,
                body,
            )
            .await?;

        let password = generate_password();
        let payload = registration.payload(password.clone());
        let dispatch = self.enqueue(
            &client,
            Operation::SaveBranchUser,
            Ok(Request::BranchUser(payload)),
            Value::Null,
            WriteBack::Flag {
                kind: DocumentKind::BranchUser,
                name: registration.name,
                field: BRANCH_USER_SUBMITTED_FIELD,
            },
        );
        Ok(BranchUserTicket { dispatch, password })
    }

    /// Reports the mapping status of an imported item.
    pub async fn update_imported_item(&self, update: ImportedItemUpdate) -> Result<Dispatch, SubmissionError> {
        self.require(DocumentKind::Item, &update.name).await?;
        let client = self.client(&update.company, &update.branch_id).await?;
        let snapshot = serde_json::to_value(&update).unwrap_or(Value::Null);
        Ok(self.enqueue(
            &client,
            Operation::UpdateImportedItem,
            update.payload().map(Request::ImportedItemUpdate),
            snapshot,
            WriteBack::Flag {
                kind: DocumentKind::Item,
                name: update.name,
                field: IMPORTED_ITEM_SUBMITTED_FIELD,
            },
        ))
    }

    // -- Searches -------------------------------------------------------------

    /// Imported items declared in the last year.
    pub async fn search_imported_items(&self, company: &str, branch: &str) -> Result<Dispatch, SubmissionError> {
        let query = rolling_query(lookback::IMPORTED_ITEMS);
        self.search(company, branch, Request::ImportedItems(query), MirrorKind::ImportedItem)
            .await
    }

    /// Notices published in the last month.
    pub async fn search_notices(&self, company: &str, branch: &str) -> Result<Dispatch, SubmissionError> {
        let query = rolling_query(lookback::NOTICES);
        self.search(company, branch, Request::Notices(query), MirrorKind::Notice)
            .await
    }

    /// Stock movements of the last week.
    pub async fn search_stock_movements(&self, company: &str, branch: &str) -> Result<Dispatch, SubmissionError> {
        let query = rolling_query(lookback::STOCK_MOVEMENTS);
        self.search(company, branch, Request::StockMovements(query), MirrorKind::StockMovement)
            .await
    }

    async fn search(
        &self,
        company: &str,
        branch: &str,
        request: Request,
        mirror: MirrorKind,
    ) -> Result<Dispatch, SubmissionError> {
        let client = self.client(company, branch).await?;
        Ok(self.enqueue(
            &client,
            request.operation(),
            Ok(request),
            Value::Null,
            WriteBack::Search {
                kind: mirror,
                company: company.to_string(),
            },
        ))
    }

    /// Registered branches of the taxpayer. Runs in the caller's task.
    pub async fn search_branches(&self, company: &str, branch: &str) -> Result<RemoteResponse, SubmissionError> {
        let client = self.client(company, branch).await?;
        let step = self.step(
            &client,
            Operation::SearchBranches,
            Ok(Request::Branches(LastRequestQuery::new(BRANCH_SEARCH_SINCE))),
            Value::Null,
            WriteBack::Search {
                kind: MirrorKind::Branch,
                company: company.to_string(),
            },
        );
        Ok(self.dispatcher.run_now(&step, &client).await?)
    }

    // -- Reference data -------------------------------------------------------

    /// Full code-list pull through the first active branch.
    pub async fn refresh_code_lists(&self) -> Result<Dispatch, SubmissionError> {
        self.refresh(Request::CodeLists(LastRequestQuery::new(CODE_LIST_SINCE)), WriteBack::CodeLists)
            .await
    }

    /// Full item classification pull through the first active branch.
    pub async fn refresh_item_classes(&self) -> Result<Dispatch, SubmissionError> {
        self.refresh(
            Request::ItemClasses(LastRequestQuery::new(ITEM_CLASS_SINCE)),
            WriteBack::ItemClasses,
        )
        .await
    }

    async fn refresh(&self, request: Request, write_back: WriteBack) -> Result<Dispatch, SubmissionError> {
        let Some(settings) = self.active_settings().await?.into_iter().next() else {
            return Ok(Dispatch::Skipped("no active eTIMS settings".to_string()));
        };
        let client = self.client(&settings.company, &settings.bhfid).await?;
        Ok(self.enqueue(&client, request.operation(), Ok(request), Value::Null, write_back))
    }

    /// Active settings of this vendor in the current environment.
    pub async fn active_settings(&self) -> Result<Vec<EtimsSettings>, SubmissionError> {
        let environment = self.clients.environment();
        let mut active: Vec<EtimsSettings> = self
            .settings
            .list_active()
            .await?
            .into_iter()
            .filter(|s| s.vendor == self.vendor && s.environment == environment)
            .collect();
        active.sort_by(|a, b| (&a.company, &a.bhfid).cmp(&(&b.company, &b.bhfid)));
        Ok(active)
    }

    // -- Plumbing ---------------------------------------------------------------

    pub(crate) async fn pending(&self, kind: DocumentKind) -> Result<Vec<String>, SubmissionError> {
        Ok(self.documents.pending(kind).await?)
    }

    pub(crate) async fn pending_inventory(&self) -> Result<Vec<String>, SubmissionError> {
        Ok(self.documents.pending_inventory().await?)
    }

    async fn client(&self, company: &str, branch: &str) -> Result<ClientHandle, SubmissionError> {
        Ok(self.clients.get_client(company, &self.vendor, branch).await?)
    }

    async fn require(&self, kind: DocumentKind, name: &str) -> Result<StoredDocument, SubmissionError> {
        self.documents
            .load(kind, name)
            .await?
            .ok_or_else(|| SubmissionError::Validation(format!("{kind} {name} not found")))
    }

    async fn item_index(&self, codes: &[String]) -> Result<ItemIndex, SubmissionError> {
        let mut index = ItemIndex::new();
        for code in codes {
            if index.contains_key(code) {
                continue;
            }
            if let Some(doc) = self.documents.load(DocumentKind::Item, code).await? {
                index.insert(code.clone(), doc.item_snapshot()?);
            }
        }
        Ok(index)
    }

    fn step(
        &self,
        client: &ClientHandle,
        operation: Operation,
        request: Result<Request, PayloadError>,
        fallback_snapshot: Value,
        write_back: WriteBack,
    ) -> VendorStep {
        VendorStep::new(
            operation,
            client.key.to_string(),
            request,
            fallback_snapshot,
            write_back,
            self.handlers.clone(),
        )
    }

    fn enqueue(
        &self,
        client: &ClientHandle,
        operation: Operation,
        request: Result<Request, PayloadError>,
        fallback_snapshot: Value,
        write_back: WriteBack,
    ) -> Dispatch {
        let step: Arc<dyn Step> = Arc::new(self.step(client, operation, request, fallback_snapshot, write_back));
        self.dispatcher.dispatch(step, client.clone())
    }
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn rolling_query(days: i64) -> LastRequestQuery {
    LastRequestQuery::new(last_request_date(Utc::now().naive_utc(), days))
}

impl std::fmt::Debug for EtimsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtimsService")
            .field("vendor", &self.vendor)
            .field("clients", &self.clients)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// JSON view of a dispatch for HTTP responses.
#[must_use]
pub fn dispatch_json(dispatch: &Dispatch) -> Value {
    match dispatch {
        Dispatch::Enqueued(ticket) => json!({"status": dispatch.status(), "job": ticket.job_name}),
        Dispatch::Skipped(reason) => json!({"status": dispatch.status(), "reason": reason}),
        Dispatch::InFlight | Dispatch::AlreadySubmitted => json!({"status": dispatch.status()}),
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
