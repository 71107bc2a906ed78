//! Read-only snapshots of the ERP documents the builders consume.
//!
//! Snapshots arrive as JSON from lifecycle webhooks and are stored verbatim,
//! so every field the ERP may omit has a serde default.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PayloadError;
use super::tax::{TaxBucket, TaxLine};

fn default_opening() -> String {
    "No".to_string()
}

fn default_posting_time() -> String {
    "00:00:00".to_string()
}

/// Combines an ERP posting date with its `HH:MM:SS[.ffffff]` time.
pub fn posting_datetime(date: NaiveDate, time: &str) -> Result<NaiveDateTime, PayloadError> {
    let whole_seconds = time.split('.').next().unwrap_or(time);
    NaiveTime::parse_from_str(whole_seconds, "%H:%M:%S")
        .map(|t| date.and_time(t))
        .map_err(|e| PayloadError::Format(format!("posting time '{time}': {e}")))
}

/// One line of a sales, POS or purchase invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// 1-based line index.
    pub idx: u32,
    /// ERP item code.
    pub item_code: String,
    /// Display name.
    pub item_name: String,
    /// Registered eTIMS item code.
    #[serde(default)]
    pub etims_item_code: Option<String>,
    /// Item classification code.
    #[serde(default)]
    pub item_classification: Option<String>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub barcode: Option<String>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub packaging_unit_code: Option<String>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub quantity_unit_code: Option<String>,
    /// Signed quantity; negative on returns.
    pub qty: Decimal,
    /// Unit price in company currency.
    #[serde(default)]
    pub base_rate: Decimal,
    /// Gross line amount in company currency.
    #[serde(default)]
    pub base_amount: Decimal,
    #[serde(default)]
    #[allow(missing_docs)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    #[allow(missing_docs)]
    pub discount_amount: Decimal,
    /// Taxable amount of the line.
    #[serde(default)]
    pub net_amount: Decimal,
    /// Tax computed by the ERP for the line.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Taxation type letter.
    #[serde(default)]
    pub taxation_type: TaxBucket,
}

impl InvoiceLine {
    /// Contribution of this line to the tax buckets.
    #[must_use]
    pub const fn tax_line(&self) -> TaxLine {
        TaxLine {
            bucket: self.taxation_type,
            taxable: self.net_amount,
            tax: self.tax_amount,
        }
    }
}

/// Sales or POS invoice. Credit notes are invoices with `is_return` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct InvoiceSnapshot {
    pub name: String,
    pub company: String,
    #[serde(default)]
    pub branch: Option<String>,
    pub posting_date: NaiveDate,
    #[serde(default = "default_posting_time")]
    pub posting_time: String,
    #[serde(default)]
    pub amended_from: Option<String>,
    #[serde(default)]
    pub is_return: bool,
    /// Original invoice of a credit note.
    #[serde(default)]
    pub return_against: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub payment_type_code: Option<String>,
    #[serde(default)]
    pub transaction_progress_code: Option<String>,
    #[serde(default)]
    pub base_net_total: Decimal,
    #[serde(default)]
    pub total_taxes_and_charges: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    pub owner: String,
    pub modified_by: String,
    #[serde(default)]
    pub update_stock: bool,
    #[serde(default)]
    pub defer_submission: bool,
    #[serde(default = "default_opening")]
    pub is_opening: String,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
}

/// Purchase invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PurchaseSnapshot {
    pub name: String,
    pub company: String,
    #[serde(default)]
    pub branch: Option<String>,
    pub posting_date: NaiveDate,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub supplier_branch_id: Option<String>,
    /// Supplier's own invoice number.
    #[serde(default)]
    pub bill_no: Option<String>,
    #[serde(default)]
    pub purchase_type_code: Option<String>,
    #[serde(default)]
    pub receipt_type_code: Option<String>,
    #[serde(default)]
    pub payment_type_code: Option<String>,
    #[serde(default)]
    pub purchase_status_code: Option<String>,
    #[serde(default)]
    pub is_return: bool,
    #[serde(default)]
    pub update_stock: bool,
    #[serde(default)]
    pub base_net_total: Decimal,
    #[serde(default)]
    pub total_taxes_and_charges: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    pub owner: String,
    pub modified_by: String,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
}

/// A stock ledger row: one item moving in or out of one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct StockLedgerEntry {
    pub name: String,
    pub company: String,
    #[serde(default)]
    pub docstatus: i16,
    /// Doctype of the voucher that caused the movement.
    pub voucher_type: String,
    pub voucher_no: String,
    /// Row of the voucher the movement belongs to.
    #[serde(default)]
    pub voucher_detail_no: Option<String>,
    pub item_code: String,
    pub warehouse: String,
    /// Signed quantity moved.
    pub actual_qty: Decimal,
    /// Balance after the movement.
    #[serde(default)]
    pub qty_after_transaction: Decimal,
    pub owner: String,
    #[serde(default)]
    pub modified_by: Option<String>,
}

/// Row of a stock voucher.
///
/// Which amount is populated depends on the voucher type: reconciliations
/// carry `valuation_rate` and `quantity_difference`, stock entries carry
/// `basic_rate` and warehouses, sales documents carry `base_net_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct VoucherLine {
    #[serde(default)]
    pub name: Option<String>,
    pub idx: u32,
    pub item_code: String,
    #[serde(default)]
    pub qty: Decimal,
    #[serde(default)]
    pub quantity_difference: Decimal,
    #[serde(default)]
    pub basic_rate: Decimal,
    #[serde(default)]
    pub valuation_rate: Decimal,
    #[serde(default)]
    pub base_net_rate: Decimal,
    #[serde(default)]
    pub net_amount: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub s_warehouse: Option<String>,
    #[serde(default)]
    pub t_warehouse: Option<String>,
}

/// The voucher behind a stock ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct StockVoucher {
    pub name: String,
    pub posting_date: NaiveDate,
    pub owner: String,
    pub modified_by: String,
    /// Stock Reconciliation purpose, e.g. `Opening Stock`.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Stock Entry type, e.g. `Material Transfer`.
    #[serde(default)]
    pub stock_entry_type: Option<String>,
    #[serde(default)]
    pub is_return: bool,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Vendor-accepted flag of a sales invoice voucher.
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub items: Vec<VoucherLine>,
}

/// Item master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ItemSnapshot {
    pub name: String,
    pub item_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub etims_item_code: Option<String>,
    #[serde(default)]
    pub item_classification: Option<String>,
    /// Product type code: 1 raw material, 2 finished, 3 service.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub country_of_origin_code: Option<String>,
    #[serde(default)]
    pub packaging_unit_code: Option<String>,
    #[serde(default)]
    pub quantity_unit_code: Option<String>,
    #[serde(default)]
    pub taxation_type: TaxBucket,
    #[serde(default)]
    pub valuation_rate: Decimal,
    #[serde(default)]
    pub is_stock_item: bool,
    /// Vendor registration flag.
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub imported_item_status: Option<String>,
    #[serde(default)]
    pub imported_item_task_code: Option<String>,
    /// Imported item this master record was mapped to.
    #[serde(default)]
    pub referenced_imported_item: Option<String>,
    /// Imported item update accepted by the vendor.
    #[serde(default)]
    pub imported_item_submitted: bool,
    pub owner: String,
    pub modified_by: String,
}

impl ItemSnapshot {
    /// True when the item came in through an import declaration.
    #[must_use]
    pub fn is_imported(&self) -> bool {
        self.imported_item_status.as_deref().is_some_and(|s| !s.is_empty())
            && self
                .imported_item_task_code
                .as_deref()
                .is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_posting_datetime_drops_fraction() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let at = posting_datetime(date, "14:07:09.123456").unwrap();
        assert_eq!(at.format("%Y%m%d%H%M%S").to_string(), "20240305140709");
    }

    #[test]
    fn test_posting_datetime_rejects_garbage() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(matches!(
            posting_datetime(date, "noon"),
            Err(PayloadError::Format(_))
        ));
    }

    #[test]
    fn test_invoice_defaults() {
        let invoice: InvoiceSnapshot = serde_json::from_value(json!({
            "name": "SINV-00-00001",
            "company": "Acme",
            "posting_date": "2024-03-05",
            "owner": "clerk@acme.co.ke",
            "modified_by": "clerk@acme.co.ke",
            "items": [{"idx": 1, "item_code": "SUGAR", "item_name": "Sugar", "qty": "2"}]
        }))
        .unwrap();

        assert_eq!(invoice.is_opening, "No");
        assert_eq!(invoice.posting_time, "00:00:00");
        assert_eq!(invoice.items[0].taxation_type, TaxBucket::B);
        assert!(!invoice.update_stock);
    }

    #[test]
    fn test_imported_requires_status_and_task() {
        let mut item: ItemSnapshot = serde_json::from_value(json!({
            "name": "TEA", "item_name": "Tea", "owner": "a@b", "modified_by": "a@b",
            "imported_item_status": "3"
        }))
        .unwrap();
        assert!(!item.is_imported());

        item.imported_item_task_code = Some("T-1".to_string());
        assert!(item.is_imported());
    }
}
