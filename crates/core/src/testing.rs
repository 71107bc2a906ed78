//! In-memory port implementations and document fixtures for unit tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::audit::{AuditRecord, AuditRecorder, AuditStatus, AuditTrail, NewAuditRecord};
use crate::client::{ClientConfig, ClientError, ClientFactory, ClientHandle, ClientKey, ClientProvider, MokaClientCache};
use crate::codelist::{CodeCategory, CodeListSync, ItemClassification, MirrorKind, MirrorRecord, MirrorStore, ReferenceCode};
use crate::handlers::{ErrorEntry, ErrorHandler, ErrorLog, SuccessHandlers};
use crate::integration::{EtimsPorts, EtimsService};
use crate::payload::item::item_code_suffix;
use crate::payload::{TaxBucket, TaxRates, WarehouseBranches};
use crate::remote::{EtimsApi, LaneBudgets, Operation, RemoteError, RemoteResponse};
use crate::settings::{Environment, EtimsSettings, SettingsStore};
use crate::store::StoreError;
use crate::submission::{
    AttemptRunner, DOCSTATUS_SUBMITTED, Dispatcher, DocumentKind, DocumentStore, ReferenceData,
    StoredDocument, SubmissionFlag,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

// ---------------------------------------------------------------------------
// Vendor
// ---------------------------------------------------------------------------

/// Replays scripted results per operation and records every request.
#[derive(Default)]
pub struct ScriptedApi {
    scripted: Mutex<HashMap<Operation, VecDeque<Result<RemoteResponse, RemoteError>>>>,
    calls: Mutex<Vec<(Operation, Value)>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedApi {
    /// Queues a response for the next call to `operation`.
    pub fn respond(&self, operation: Operation, response: RemoteResponse) {
        lock(&self.scripted)
            .entry(operation)
            .or_default()
            .push_back(Ok(response));
    }

    /// Queues a transport failure for the next call to `operation`.
    pub fn fail(&self, operation: Operation, error: RemoteError) {
        lock(&self.scripted)
            .entry(operation)
            .or_default()
            .push_back(Err(error));
    }

    /// Delays every subsequent call.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<(Operation, Value)> {
        lock(&self.calls).clone()
    }

    /// Request bodies sent to `operation`.
    pub fn calls_to(&self, operation: Operation) -> Vec<Value> {
        lock(&self.calls)
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl EtimsApi for ScriptedApi {
    async fn call(&self, operation: Operation, body: Value) -> Result<RemoteResponse, RemoteError> {
        lock(&self.calls).push((operation, body));
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = lock(&self.scripted)
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| {
            Ok(RemoteResponse::Success {
                message: "It is succeeded".to_string(),
                result_dt: Some("20241019120000".to_string()),
                data: None,
            })
        })
    }
}

/// Hands out one shared [`ScriptedApi`] and counts connections.
pub struct CountingFactory {
    api: Arc<ScriptedApi>,
    connections: AtomicUsize,
}

impl CountingFactory {
    /// A factory handing out `api`.
    pub fn with_api(api: Arc<ScriptedApi>) -> Self {
        Self {
            api,
            connections: AtomicUsize::new(0),
        }
    }

    /// Clients built so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Default for CountingFactory {
    fn default() -> Self {
        Self::with_api(Arc::new(ScriptedApi::default()))
    }
}

impl ClientFactory for CountingFactory {
    fn connect(&self, _config: ClientConfig) -> Result<Arc<dyn EtimsApi>, ClientError> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(self.api.clone())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// A sandbox settings record for `company` and `branch`.
pub fn settings_for(company: &str, branch: &str, active: bool) -> EtimsSettings {
    let now = Utc::now();
    EtimsSettings {
        id: Uuid::now_v7(),
        company: company.to_string(),
        vendor: "OSCU KRA".to_string(),
        environment: Environment::Sandbox,
        bhfid: branch.to_string(),
        tin: "P051234567X".to_string(),
        dvc_srl_no: Some("DVC-001".to_string()),
        consumer_key: "key".to_string(),
        consumer_secret: "secret".to_string(),
        communication_key: Some("CMC".to_string()),
        scu_id: Some("KRACU0100000001".to_string()),
        is_active: active,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    records: Mutex<Vec<EtimsSettings>>,
}

impl MemorySettingsStore {
    pub fn seed(&self, settings: EtimsSettings) {
        lock(&self.records).push(settings);
    }

    pub fn all(&self) -> Vec<EtimsSettings> {
        lock(&self.records).clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, id: Uuid) -> Result<Option<EtimsSettings>, StoreError> {
        Ok(lock(&self.records).iter().find(|s| s.id == id).cloned())
    }

    async fn find_active(
        &self,
        company: &str,
        vendor: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<Option<EtimsSettings>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .find(|s| {
                s.is_active
                    && s.company == company
                    && s.vendor == vendor
                    && s.environment == environment
                    && s.bhfid == bhfid
            })
            .cloned())
    }

    async fn insert(&self, settings: &EtimsSettings) -> Result<(), StoreError> {
        lock(&self.records).push(settings.clone());
        Ok(())
    }

    async fn update(&self, settings: &EtimsSettings) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        let slot = records
            .iter_mut()
            .find(|s| s.id == settings.id)
            .ok_or_else(|| StoreError::NotFound(settings.id.to_string()))?;
        *slot = settings.clone();
        Ok(())
    }

    async fn activate(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        let target = records
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        for s in records.iter_mut() {
            if s.id == id {
                s.is_active = true;
            } else if s.company == target.company
                && s.environment == target.environment
                && s.bhfid == target.bhfid
            {
                s.is_active = false;
            }
        }
        Ok(())
    }

    async fn count_active(
        &self,
        company: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<u64, StoreError> {
        let count = lock(&self.records)
            .iter()
            .filter(|s| s.is_active && s.company == company && s.environment == environment && s.bhfid == bhfid)
            .count();
        Ok(count as u64)
    }

    async fn list_active(&self) -> Result<Vec<EtimsSettings>, StoreError> {
        Ok(lock(&self.records).iter().filter(|s| s.is_active).cloned().collect())
    }

    async fn list(&self, company: Option<&str>) -> Result<Vec<EtimsSettings>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .filter(|s| company.is_none_or(|c| s.company == c))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Audit and error log
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryAuditTrail {
    records: Mutex<Vec<AuditRecord>>,
    finalized: Mutex<HashMap<Uuid, usize>>,
}

impl MemoryAuditTrail {
    pub fn records(&self) -> Vec<AuditRecord> {
        lock(&self.records).clone()
    }

    pub fn status(&self, id: Uuid) -> Option<AuditStatus> {
        lock(&self.records).iter().find(|r| r.id == id).map(|r| r.status)
    }

    pub fn finalize_count(&self, id: Uuid) -> usize {
        lock(&self.finalized).get(&id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

#[async_trait]
impl AuditTrail for MemoryAuditTrail {
    async fn open(&self, record: NewAuditRecord) -> Result<(), StoreError> {
        let now = Utc::now();
        lock(&self.records).push(AuditRecord {
            id: record.id,
            operation: record.operation.route().to_string(),
            url: record.url,
            reference_doctype: record.reference_doctype,
            reference_name: record.reference_name,
            data: record.data,
            status: AuditStatus::Pending,
            output: None,
            error: None,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: AuditStatus,
        output: Option<String>,
        error: Option<String>,
    ) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.status = status;
        record.output = output;
        record.error = error;
        record.updated_at = Utc::now();
        *lock(&self.finalized).entry(id).or_default() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryErrorLog {
    entries: Mutex<Vec<ErrorEntry>>,
}

impl MemoryErrorLog {
    pub fn entries(&self) -> Vec<ErrorEntry> {
        lock(&self.entries).clone()
    }
}

#[async_trait]
impl ErrorLog for MemoryErrorLog {
    async fn record(&self, entry: ErrorEntry) -> Result<(), StoreError> {
        lock(&self.entries).push(entry);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Documents and reference data
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<(String, String), StoredDocument>>,
}

fn doc_key(kind: DocumentKind, name: &str) -> (String, String) {
    (kind.slug().to_string(), name.to_string())
}

fn merge(target: &mut Value, fields: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        map.extend(fields);
    }
}

impl MemoryDocumentStore {
    /// Stores a finalized document. The company comes from the body.
    pub fn seed(&self, kind: DocumentKind, name: &str, body: Value) {
        let company = body
            .get("company")
            .and_then(Value::as_str)
            .unwrap_or("Acme")
            .to_string();
        lock(&self.documents).insert(
            doc_key(kind, name),
            StoredDocument {
                kind,
                name: name.to_string(),
                company,
                docstatus: DOCSTATUS_SUBMITTED,
                submitted: false,
                inventory_submitted: false,
                body,
                vendor_fields: json!({}),
                updated_at: Utc::now(),
            },
        );
    }

    /// Sets the submitted flag directly.
    pub fn set_submitted(&self, kind: DocumentKind, name: &str) {
        if let Some(doc) = lock(&self.documents).get_mut(&doc_key(kind, name)) {
            doc.submitted = true;
        }
    }

    pub fn get(&self, kind: DocumentKind, name: &str) -> Option<StoredDocument> {
        lock(&self.documents).get(&doc_key(kind, name)).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, kind: DocumentKind, name: &str) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.get(kind, name))
    }

    async fn upsert(
        &self,
        kind: DocumentKind,
        name: &str,
        company: &str,
        docstatus: i16,
        body: Value,
    ) -> Result<StoredDocument, StoreError> {
        let mut documents = lock(&self.documents);
        let doc = documents
            .entry(doc_key(kind, name))
            .or_insert_with(|| StoredDocument {
                kind,
                name: name.to_string(),
                company: company.to_string(),
                docstatus,
                submitted: false,
                inventory_submitted: false,
                body: Value::Null,
                vendor_fields: json!({}),
                updated_at: Utc::now(),
            });
        doc.company = company.to_string();
        doc.docstatus = docstatus;
        doc.body = body;
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn pending(&self, kind: DocumentKind) -> Result<Vec<String>, StoreError> {
        Ok(lock(&self.documents)
            .values()
            .filter(|d| d.kind == kind && d.docstatus == DOCSTATUS_SUBMITTED && !d.submitted)
            .map(|d| d.name.clone())
            .collect())
    }

    async fn pending_inventory(&self) -> Result<Vec<String>, StoreError> {
        Ok(lock(&self.documents)
            .values()
            .filter(|d| d.kind == DocumentKind::StockLedgerEntry && d.submitted && !d.inventory_submitted)
            .map(|d| d.name.clone())
            .collect())
    }

    async fn filter_eligible(
        &self,
        kind: DocumentKind,
        names: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let documents = lock(&self.documents);
        Ok(names
            .iter()
            .filter(|name| {
                documents
                    .get(&doc_key(kind, name))
                    .is_some_and(|d| d.docstatus == DOCSTATUS_SUBMITTED && !d.submitted)
            })
            .cloned()
            .collect())
    }

    async fn mark_submitted(
        &self,
        kind: DocumentKind,
        name: &str,
        flag: SubmissionFlag,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut documents = lock(&self.documents);
        let doc = documents
            .get_mut(&doc_key(kind, name))
            .ok_or_else(|| StoreError::NotFound(format!("{kind} {name}")))?;
        merge(&mut doc.vendor_fields, fields);
        match flag {
            SubmissionFlag::Submitted => doc.submitted = true,
            SubmissionFlag::InventorySubmitted => doc.inventory_submitted = true,
        }
        Ok(())
    }

    async fn merge_vendor_fields(
        &self,
        kind: DocumentKind,
        name: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut documents = lock(&self.documents);
        let doc = documents
            .get_mut(&doc_key(kind, name))
            .ok_or_else(|| StoreError::NotFound(format!("{kind} {name}")))?;
        merge(&mut doc.vendor_fields, fields);
        Ok(())
    }

    async fn max_item_code_suffix(&self, classification: &str) -> Result<Option<u32>, StoreError> {
        Ok(lock(&self.documents)
            .values()
            .filter(|d| d.kind == DocumentKind::Item)
            .filter(|d| d.body.get("item_classification").and_then(Value::as_str) == Some(classification))
            .filter_map(|d| d.vendor_field("etims_item_code").and_then(Value::as_str).and_then(item_code_suffix))
            .max())
    }
}

pub struct MemoryReferenceData {
    rates: TaxRates,
    warehouses: Mutex<HashMap<String, String>>,
}

impl MemoryReferenceData {
    pub fn set_branch(&self, warehouse: &str, branch: &str) {
        lock(&self.warehouses).insert(warehouse.to_string(), branch.to_string());
    }
}

impl Default for MemoryReferenceData {
    fn default() -> Self {
        Self {
            rates: HashMap::from([
                (TaxBucket::A, Decimal::ZERO),
                (TaxBucket::B, dec!(16)),
                (TaxBucket::C, Decimal::ZERO),
                (TaxBucket::D, Decimal::ZERO),
                (TaxBucket::E, dec!(8)),
            ]),
            warehouses: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ReferenceData for MemoryReferenceData {
    async fn taxation_rates(&self) -> Result<TaxRates, StoreError> {
        Ok(self.rates.clone())
    }

    async fn warehouse_branches(&self, warehouses: &[String]) -> Result<WarehouseBranches, StoreError> {
        let known = lock(&self.warehouses);
        Ok(warehouses
            .iter()
            .filter_map(|w| known.get(w).map(|b| (w.clone(), b.clone())))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryMirrorStore {
    codes: Mutex<BTreeMap<(CodeCategory, String), ReferenceCode>>,
    classes: Mutex<BTreeMap<String, ItemClassification>>,
    records: Mutex<HashMap<(MirrorKind, String, String), MirrorRecord>>,
    cursors: Mutex<HashMap<String, String>>,
    cursor_failure: Mutex<Option<String>>,
}

impl MemoryMirrorStore {
    /// Makes every later cursor write fail with `message`.
    pub fn fail_cursors(&self, message: &str) {
        *lock(&self.cursor_failure) = Some(message.to_string());
    }

    pub fn cursor_count(&self) -> usize {
        lock(&self.cursors).len()
    }

    pub fn code_count(&self) -> usize {
        lock(&self.codes).len()
    }

    pub fn records(&self, kind: MirrorKind) -> Vec<MirrorRecord> {
        lock(&self.records)
            .iter()
            .filter(|((k, _, _), _)| *k == kind)
            .map(|(_, record)| record.clone())
            .collect()
    }
}

/// Inserts or replaces `value`, reporting whether anything changed.
fn put<K: Ord, V: PartialEq>(map: &mut BTreeMap<K, V>, key: K, value: V) -> bool {
    if map.get(&key) == Some(&value) {
        return false;
    }
    map.insert(key, value);
    true
}

#[async_trait]
impl MirrorStore for MemoryMirrorStore {
    async fn upsert_codes(&self, category: CodeCategory, codes: &[ReferenceCode]) -> Result<u64, StoreError> {
        let mut stored = lock(&self.codes);
        let changed = codes
            .iter()
            .filter(|code| put(&mut stored, (category, code.code.clone()), (*code).clone()))
            .count();
        Ok(changed as u64)
    }

    async fn upsert_item_classes(&self, classes: &[ItemClassification]) -> Result<u64, StoreError> {
        let mut stored = lock(&self.classes);
        let changed = classes
            .iter()
            .filter(|class| put(&mut stored, class.code.clone(), (*class).clone()))
            .count();
        Ok(changed as u64)
    }

    async fn upsert_records(
        &self,
        kind: MirrorKind,
        company: &str,
        records: &[MirrorRecord],
    ) -> Result<u64, StoreError> {
        let mut stored = lock(&self.records);
        let mut changed = 0;
        for record in records {
            let key = (kind, company.to_string(), record.key.clone());
            if stored.get(&key) != Some(record) {
                stored.insert(key, record.clone());
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn codes(&self, category: CodeCategory) -> Result<Vec<ReferenceCode>, StoreError> {
        Ok(lock(&self.codes)
            .iter()
            .filter(|((c, _), _)| *c == category)
            .map(|(_, code)| code.clone())
            .collect())
    }

    async fn record_cursor(&self, route: &str, last_req_dt: &str) -> Result<(), StoreError> {
        if let Some(message) = lock(&self.cursor_failure).clone() {
            return Err(StoreError::Backend(message));
        }
        lock(&self.cursors).insert(route.to_string(), last_req_dt.to_string());
        Ok(())
    }

    async fn cursor(&self, route: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.cursors).get(route).cloned())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Every in-memory port wired together, with active sandbox settings for
/// `Acme` branch `00`.
pub struct Harness {
    pub api: Arc<ScriptedApi>,
    pub factory: Arc<CountingFactory>,
    pub settings: Arc<MemorySettingsStore>,
    pub documents: Arc<MemoryDocumentStore>,
    pub reference: Arc<MemoryReferenceData>,
    pub mirror: Arc<MemoryMirrorStore>,
    pub trail: Arc<MemoryAuditTrail>,
    pub errors: Arc<MemoryErrorLog>,
}

impl Harness {
    pub fn new() -> Self {
        let api = Arc::new(ScriptedApi::default());
        let settings = Arc::new(MemorySettingsStore::default());
        settings.seed(settings_for("Acme", "00", true));
        Self {
            factory: Arc::new(CountingFactory::with_api(api.clone())),
            api,
            settings,
            documents: Arc::new(MemoryDocumentStore::default()),
            reference: Arc::new(MemoryReferenceData::default()),
            mirror: Arc::new(MemoryMirrorStore::default()),
            trail: Arc::new(MemoryAuditTrail::default()),
            errors: Arc::new(MemoryErrorLog::default()),
        }
    }

    pub fn handlers(&self) -> SuccessHandlers {
        SuccessHandlers::new(self.documents.clone(), CodeListSync::new(self.mirror.clone()))
    }

    pub fn runner(&self) -> AttemptRunner {
        AttemptRunner::new(
            AuditRecorder::new(self.trail.clone()),
            ErrorHandler::new(self.errors.clone()),
            self.handlers(),
        )
    }

    pub fn dispatcher(&self, budgets: LaneBudgets) -> Dispatcher {
        Dispatcher::new(self.runner(), budgets)
    }

    /// A handle around the scripted client, bypassing the provider.
    pub fn client(&self) -> ClientHandle {
        let settings = settings_for("Acme", "00", true);
        ClientHandle {
            key: ClientKey::new("Acme", "OSCU KRA", "00"),
            config: Arc::new(ClientConfig::from_settings(&settings, Duration::from_secs(30))),
            api: self.api.clone(),
        }
    }

    pub fn clients(&self) -> ClientProvider {
        ClientProvider::new(
            self.settings.clone(),
            self.factory.clone(),
            Arc::new(MokaClientCache::new()),
            Environment::Sandbox,
            Duration::from_secs(30),
        )
    }

    pub fn service(&self) -> EtimsService {
        self.service_with(LaneBudgets::default())
    }

    pub fn service_with(&self, budgets: LaneBudgets) -> EtimsService {
        let ports = EtimsPorts {
            settings: self.settings.clone(),
            documents: self.documents.clone(),
            reference: self.reference.clone(),
            mirror: self.mirror.clone(),
            audit: self.trail.clone(),
            errors: self.errors.clone(),
        };
        EtimsService::new(ports, self.clients(), budgets, "OSCU KRA")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A stock-updating sales invoice with one standard-rated line.
pub fn sales_invoice_body(name: &str, branch: &str) -> Value {
    json!({
        "name": name,
        "company": "Acme",
        "docstatus": 1,
        "branch": branch,
        "posting_date": "2024-03-05",
        "posting_time": "09:15:30.123456",
        "tax_id": "A123456789Z",
        "customer": "Jane",
        "payment_type_code": "01",
        "transaction_progress_code": "02",
        "base_net_total": "100",
        "total_taxes_and_charges": "16",
        "grand_total": "116",
        "owner": "clerk@acme.co.ke",
        "modified_by": "clerk@acme.co.ke",
        "update_stock": true,
        "is_opening": "No",
        "items": [{
            "idx": 1,
            "item_code": "ITEM-1",
            "item_name": "Soda 500ml",
            "etims_item_code": "KE2NTBA0000001",
            "item_classification": "5020230500",
            "packaging_unit_code": "NT",
            "quantity_unit_code": "BA",
            "qty": "2",
            "base_rate": "50",
            "base_amount": "100",
            "net_amount": "100",
            "tax_amount": "16",
            "taxation_type": "B"
        }]
    })
}

/// A stock-updating purchase invoice with one line of `ITEM-1`.
pub fn purchase_body(name: &str) -> Value {
    json!({
        "name": name,
        "company": "Acme",
        "docstatus": 1,
        "branch": "00",
        "posting_date": "2024-03-05",
        "supplier": "Supplies Ltd",
        "tax_id": "P000000001A",
        "supplier_branch_id": "00",
        "bill_no": "BILL-77",
        "purchase_type_code": "N",
        "receipt_type_code": "P",
        "payment_type_code": "01",
        "purchase_status_code": "02",
        "update_stock": true,
        "base_net_total": "100",
        "total_taxes_and_charges": "16",
        "grand_total": "116",
        "owner": "buyer@acme.co.ke",
        "modified_by": "buyer@acme.co.ke",
        "items": [{
            "idx": 1,
            "item_code": "ITEM-1",
            "item_name": "Soda 500ml",
            "etims_item_code": "KE2NTBA0000001",
            "qty": "2",
            "base_rate": "50",
            "base_amount": "100",
            "net_amount": "100",
            "tax_amount": "16",
            "taxation_type": "B"
        }]
    })
}

/// An item master record with a complete code prefix (`KE2NTBA`).
pub fn item_body(code: &str) -> Value {
    json!({
        "name": code,
        "item_name": format!("{code} 500ml"),
        "company": "Acme",
        "item_classification": "5020230500",
        "product_type": "2",
        "country_of_origin_code": "KE",
        "packaging_unit_code": "NT",
        "quantity_unit_code": "BA",
        "taxation_type": "B",
        "valuation_rate": "40",
        "is_stock_item": true,
        "owner": "admin@acme.co.ke",
        "modified_by": "admin@acme.co.ke"
    })
}

/// A ledger row in warehouse `Stores - AC`.
pub fn ledger_entry_body(
    name: &str,
    voucher_type: &str,
    voucher_no: &str,
    item_code: &str,
    qty: Decimal,
) -> Value {
    json!({
        "name": name,
        "company": "Acme",
        "docstatus": 1,
        "voucher_type": voucher_type,
        "voucher_no": voucher_no,
        "item_code": item_code,
        "warehouse": "Stores - AC",
        "actual_qty": qty,
        "qty_after_transaction": "25",
        "owner": "clerk@acme.co.ke"
    })
}

/// A material receipt of five `ITEM-1` into `Stores - AC`.
pub fn stock_entry_body(name: &str) -> Value {
    json!({
        "name": name,
        "company": "Acme",
        "docstatus": 1,
        "posting_date": "2024-03-05",
        "owner": "clerk@acme.co.ke",
        "modified_by": "clerk@acme.co.ke",
        "stock_entry_type": "Material Receipt",
        "items": [{
            "name": "STE-DETAIL-1",
            "idx": 1,
            "item_code": "ITEM-1",
            "qty": "5",
            "basic_rate": "40",
            "t_warehouse": "Stores - AC"
        }]
    })
}
