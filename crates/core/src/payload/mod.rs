//! Pure builders from ERP document snapshots to vendor request bodies.
//!
//! Nothing here performs I/O. Reference data the builders need (tax rates,
//! warehouse branches, item master records) is passed in by the caller.

pub mod error;
pub mod invoice;
pub mod item;
pub mod purchase;
pub mod registry;
pub mod series;
pub mod stock;
pub mod tax;
pub mod types;
pub mod wire;

pub use error::PayloadError;
pub use invoice::build_sales_payload;
pub use item::{
    CompositionComponent, CompositionRequest, assign_item_code, build_composition_payloads,
    build_item_payload,
};
pub use purchase::build_purchase_payload;
pub use registry::{
    BranchCustomerRegistration, BranchUserRegistration, CustomerLookup, ImportedItemUpdate,
    InsuranceRegistration,
};
pub use series::{extract_document_series_number, get_invoice_number, split_user_email};
pub use stock::{
    ItemIndex, Movement, StockMovementInput, VoucherType, WarehouseBranches,
    build_stock_master_payload, build_stock_movement_payload,
};
pub use tax::{TaxBreakdown, TaxBucket, TaxLine, TaxRates};
pub use types::{
    InvoiceLine, InvoiceSnapshot, ItemSnapshot, PurchaseSnapshot, StockLedgerEntry, StockVoucher,
    VoucherLine,
};
