//! Stock movement and stock master payloads.
//!
//! A stock ledger entry is one item entering or leaving one warehouse. The
//! movement code depends on the voucher that caused it; the decision table
//! lives in [`Movement::code`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use etims_shared::{Amount, quantize};
use rust_decimal::Decimal;

use super::error::PayloadError;
use super::series::extract_document_series_number;
use super::types::{ItemSnapshot, StockLedgerEntry, StockVoucher, VoucherLine};
use super::wire::{Registrant, StockItem, StockMasterPayload, StockMovementPayload};

/// Registration type for movements the ERP reports on its own.
const MANUAL_MOVEMENT: &str = "M";

/// Warehouse name to branch id.
pub type WarehouseBranches = HashMap<String, String>;

/// Item master records by ERP item code.
pub type ItemIndex = HashMap<String, ItemSnapshot>;

/// Doctypes that move stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoucherType {
    /// `Stock Reconciliation`
    StockReconciliation,
    /// `Stock Entry`
    StockEntry,
    /// `Purchase Receipt`
    PurchaseReceipt,
    /// `Purchase Invoice`
    PurchaseInvoice,
    /// `Delivery Note`
    DeliveryNote,
    /// `Sales Invoice`
    SalesInvoice,
}

impl VoucherType {
    /// ERP doctype name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StockReconciliation => "Stock Reconciliation",
            Self::StockEntry => "Stock Entry",
            Self::PurchaseReceipt => "Purchase Receipt",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::DeliveryNote => "Delivery Note",
            Self::SalesInvoice => "Sales Invoice",
        }
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherType {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Stock Reconciliation" => Ok(Self::StockReconciliation),
            "Stock Entry" => Ok(Self::StockEntry),
            "Purchase Receipt" => Ok(Self::PurchaseReceipt),
            "Purchase Invoice" => Ok(Self::PurchaseInvoice),
            "Delivery Note" => Ok(Self::DeliveryNote),
            "Sales Invoice" => Ok(Self::SalesInvoice),
            other => Err(PayloadError::Format(format!(
                "voucher type '{other}' does not move stock"
            ))),
        }
    }
}

/// What a movement looks like to the vendor's movement-code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement<'a> {
    /// Stock Reconciliation row.
    Reconciliation {
        /// Voucher purpose is `Opening Stock`.
        opening: bool,
        /// Counted minus booked quantity.
        qty_difference: Decimal,
    },
    /// Stock Entry row.
    Entry {
        /// `stock_entry_type` of the voucher.
        entry_type: &'a str,
        /// Signed ledger quantity.
        actual_qty: Decimal,
    },
    /// Purchase Receipt or Purchase Invoice row.
    Purchase {
        #[allow(missing_docs)]
        is_return: bool,
        /// Item came in through an import declaration.
        imported: bool,
    },
    /// Delivery Note or Sales Invoice row.
    Sale {
        #[allow(missing_docs)]
        is_return: bool,
        /// Signed ledger quantity.
        actual_qty: Decimal,
    },
}

impl Movement<'_> {
    /// Two-digit `sarTyCd`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match *self {
            Self::Reconciliation { opening: true, .. } => "06",
            Self::Reconciliation { qty_difference, .. } => {
                if qty_difference < Decimal::ZERO { "16" } else { "06" }
            }
            Self::Entry { entry_type, actual_qty } => match entry_type {
                "Manufacture" | "Repack" => {
                    if actual_qty > Decimal::ZERO {
                        "05"
                    } else {
                        "14"
                    }
                }
                "Material Transfer" => {
                    if actual_qty < Decimal::ZERO {
                        "13"
                    } else {
                        "04"
                    }
                }
                "Send to Subcontractor" | "Material Issue" => "13",
                _ => "04",
            },
            Self::Purchase { is_return: true, .. } => "12",
            Self::Purchase { imported: true, .. } => "01",
            Self::Purchase { .. } => "02",
            Self::Sale { is_return: true, actual_qty } => {
                if actual_qty > Decimal::ZERO {
                    "03"
                } else {
                    "11"
                }
            }
            Self::Sale { is_return: false, .. } => "11",
        }
    }
}

/// Everything the movement builder reads.
#[derive(Debug, Clone, Copy)]
pub struct StockMovementInput<'a> {
    /// The ledger row being reported.
    pub entry: &'a StockLedgerEntry,
    /// The voucher that produced it.
    pub voucher: &'a StockVoucher,
    /// Item master records for the voucher's items.
    pub items: &'a ItemIndex,
    /// Branch of every warehouse involved.
    pub branches: &'a WarehouseBranches,
}

impl StockMovementInput<'_> {
    fn branch_of(&self, warehouse: Option<&str>) -> Option<String> {
        warehouse.and_then(|w| self.branches.get(w)).cloned()
    }
}

/// Builds the `/StockIOSaveReq` body for one ledger entry.
pub fn build_stock_movement_payload(
    input: StockMovementInput<'_>,
) -> Result<StockMovementPayload, PayloadError> {
    let StockMovementInput { entry, voucher, items, .. } = input;
    let voucher_type: VoucherType = entry.voucher_type.parse()?;
    let series_no = extract_document_series_number(&voucher.name)?;

    let lines: Vec<(&VoucherLine, &ItemSnapshot)> = voucher
        .items
        .iter()
        .filter(|line| line.item_code == entry.item_code)
        .filter_map(|line| items.get(&line.item_code).map(|item| (line, item)))
        .collect();
    let Some(&(first_line, first_item)) = lines.first() else {
        return Err(PayloadError::DataIntegrity(format!(
            "item {} not found in {} {}",
            entry.item_code, voucher_type, voucher.name
        )));
    };

    let mut cust_bhf_id = input.branch_of(Some(&entry.warehouse));
    let (mut cust_tin, mut cust_nm) = (None, None);

    let movement = match voucher_type {
        VoucherType::StockReconciliation => Movement::Reconciliation {
            opening: voucher.purpose.as_deref() == Some("Opening Stock"),
            qty_difference: first_line.quantity_difference,
        },
        VoucherType::StockEntry => {
            let entry_type = voucher.stock_entry_type.as_deref().unwrap_or_default();
            if entry_type == "Material Transfer" {
                let detail = voucher
                    .items
                    .iter()
                    .find(|line| line.name.is_some() && line.name == entry.voucher_detail_no)
                    .ok_or_else(|| {
                        PayloadError::DataIntegrity(format!(
                            "transfer row {} missing from {}",
                            entry.voucher_detail_no.as_deref().unwrap_or("<none>"),
                            voucher.name
                        ))
                    })?;
                let counterpart = if entry.actual_qty < Decimal::ZERO {
                    detail.t_warehouse.as_deref()
                } else {
                    detail.s_warehouse.as_deref()
                };
                cust_bhf_id = input.branch_of(counterpart);
            }
            Movement::Entry { entry_type, actual_qty: entry.actual_qty }
        }
        VoucherType::PurchaseReceipt | VoucherType::PurchaseInvoice => Movement::Purchase {
            is_return: voucher.is_return,
            imported: first_item.is_imported(),
        },
        VoucherType::DeliveryNote | VoucherType::SalesInvoice => {
            cust_nm.clone_from(&voucher.customer);
            cust_tin.clone_from(&voucher.tax_id);
            Movement::Sale { is_return: voucher.is_return, actual_qty: entry.actual_qty }
        }
    };

    let item_list: Vec<StockItem> = lines
        .into_iter()
        .map(|(line, item)| stock_item(voucher_type, line, item))
        .collect();

    Ok(StockMovementPayload {
        sar_no: series_no,
        org_sar_no: series_no,
        reg_ty_cd: MANUAL_MOVEMENT.to_string(),
        cust_tin,
        cust_nm,
        cust_bhf_id,
        sar_ty_cd: movement.code().to_string(),
        ocrn_dt: voucher.posting_date.format("%Y%m%d").to_string(),
        tot_item_cnt: item_list.len(),
        tot_taxbl_amt: Amount::zero(),
        tot_tax_amt: Amount::zero(),
        tot_amt: Amount::zero(),
        remark: None,
        registrant: Registrant::new(&voucher.owner, &voucher.modified_by),
        item_list,
    })
}

fn stock_item(voucher_type: VoucherType, line: &VoucherLine, item: &ItemSnapshot) -> StockItem {
    let (qty, unit_price) = match voucher_type {
        VoucherType::StockReconciliation => (line.quantity_difference.abs(), line.valuation_rate),
        VoucherType::StockEntry => (line.qty.abs(), line.basic_rate),
        VoucherType::PurchaseReceipt | VoucherType::PurchaseInvoice => {
            (line.qty.abs(), line.valuation_rate)
        }
        VoucherType::DeliveryNote | VoucherType::SalesInvoice => {
            (line.qty.abs(), line.base_net_rate)
        }
    };
    let carries_tax = matches!(
        voucher_type,
        VoucherType::PurchaseReceipt
            | VoucherType::PurchaseInvoice
            | VoucherType::DeliveryNote
            | VoucherType::SalesInvoice
    );
    let (taxbl_amt, tax_amt, tot_amt) = if carries_tax {
        (
            quantize(line.net_amount),
            quantize(line.tax_amount),
            quantize(line.net_amount + line.tax_amount),
        )
    } else {
        (Amount::zero(), Amount::zero(), Amount::zero())
    };
    let item_cd = match voucher_type {
        VoucherType::DeliveryNote | VoucherType::SalesInvoice => None,
        _ => item.etims_item_code.clone(),
    };

    StockItem {
        item_seq: line.idx,
        item_cd,
        item_cls_cd: item.item_classification.clone(),
        item_nm: item.name.clone(),
        bcd: None,
        pkg_unit_cd: item.packaging_unit_code.clone(),
        pkg: 1,
        qty_unit_cd: item.quantity_unit_code.clone(),
        qty,
        item_expr_dt: String::new(),
        prc: quantize(unit_price),
        sply_amt: quantize(unit_price),
        tot_dc_amt: Amount::zero(),
        tax_ty_cd: item.taxation_type.to_string(),
        taxbl_amt,
        tax_amt,
        tot_amt,
    }
}

/// Builds the `/StockMasterSaveReq` body: the item's balance after `entry`.
///
/// The ledger owner is stamped as both registrant and modifier.
pub fn build_stock_master_payload(
    entry: &StockLedgerEntry,
    item: &ItemSnapshot,
) -> Result<StockMasterPayload, PayloadError> {
    let item_cd = item.etims_item_code.clone().ok_or_else(|| {
        PayloadError::DataIntegrity(format!("item {} has no eTIMS item code", item.name))
    })?;

    Ok(StockMasterPayload {
        item_cd,
        rsd_qty: entry.qty_after_transaction,
        registrant: Registrant::new(&entry.owner, &entry.owner),
    })
}

#[cfg(test)]
#[path = "stock_tests.rs"]
mod tests;
