//! Purchase invoice payloads.

use etims_shared::quantize;

use super::error::PayloadError;
use super::series::extract_document_series_number;
use super::tax::{TaxBreakdown, TaxRates};
use super::types::{InvoiceLine, PurchaseSnapshot};
use super::wire::{PurchaseItem, PurchasePayload, Registrant};

/// Registration type for purchases entered by hand.
const MANUAL_PURCHASE: &str = "A";

/// Builds the `/TrnsPurchaseSaveReq` body.
pub fn build_purchase_payload(
    purchase: &PurchaseSnapshot,
    rates: &TaxRates,
) -> Result<PurchasePayload, PayloadError> {
    let invc_no = extract_document_series_number(&purchase.name)?;
    let taxes = TaxBreakdown::aggregate(purchase.items.iter().map(InvoiceLine::tax_line), rates);
    let item_list: Vec<PurchaseItem> = purchase.items.iter().map(purchase_item).collect();

    Ok(PurchasePayload {
        invc_no,
        org_invc_no: 0,
        spplr_tin: purchase.tax_id.clone(),
        spplr_bhf_id: purchase.supplier_branch_id.clone(),
        spplr_nm: purchase.supplier.clone(),
        spplr_invc_no: purchase.bill_no.clone(),
        reg_ty_cd: MANUAL_PURCHASE.to_string(),
        pchs_ty_cd: purchase.purchase_type_code.clone(),
        rcpt_ty_cd: purchase.receipt_type_code.clone(),
        pmt_ty_cd: purchase.payment_type_code.clone(),
        pchs_stts_cd: purchase.purchase_status_code.clone(),
        cfm_dt: None,
        pchs_dt: purchase.posting_date.format("%Y%m%d").to_string(),
        wrhs_dt: None,
        cncl_req_dt: String::new(),
        cncl_dt: String::new(),
        rfd_dt: None,
        tot_item_cnt: item_list.len(),
        taxes: taxes.summary(),
        tot_taxbl_amt: quantize(purchase.base_net_total),
        tot_tax_amt: quantize(purchase.total_taxes_and_charges),
        tot_amt: quantize(purchase.grand_total),
        remark: None,
        registrant: Registrant::new(&purchase.owner, &purchase.modified_by),
        item_list,
    })
}

fn purchase_item(line: &InvoiceLine) -> PurchaseItem {
    PurchaseItem {
        item_seq: line.idx,
        item_cd: line.etims_item_code.clone(),
        item_cls_cd: line.item_classification.clone(),
        item_nm: line.item_name.clone(),
        bcd: String::new(),
        spplr_item_cls_cd: None,
        spplr_item_cd: None,
        spplr_item_nm: None,
        pkg_unit_cd: line.packaging_unit_code.clone(),
        pkg: 1,
        qty_unit_cd: line.quantity_unit_code.clone(),
        qty: line.qty.abs(),
        prc: quantize(line.base_rate),
        sply_amt: quantize(line.base_amount),
        dc_rt: quantize(line.discount_percentage),
        dc_amt: quantize(line.discount_amount),
        taxbl_amt: quantize(line.net_amount),
        tax_ty_cd: line.taxation_type.to_string(),
        tax_amt: quantize(line.tax_amount),
        tot_amt: quantize(line.net_amount + line.tax_amount),
        item_expr_dt: None,
    }
}
