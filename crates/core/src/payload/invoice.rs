//! Sales and credit-note payloads.

use etims_shared::quantize;

use super::error::PayloadError;
use super::series::{clean_invc_no, get_invoice_number};
use super::tax::{TaxBreakdown, TaxRates};
use super::types::{InvoiceLine, InvoiceSnapshot, posting_datetime};
use super::wire::{Receipt, Registrant, SalesItem, SalesPayload, YES};

/// Receipt header printed by the control unit.
const RECEIPT_TOP_MESSAGE: &str = "ERPNext";

/// Receipt type code: `S` for a sale, `R` for a credit note.
#[must_use]
pub const fn receipt_type_code(is_return: bool) -> &'static str {
    if is_return { "R" } else { "S" }
}

/// Builds the `/TrnsSalesSaveWrReq` body for a sales or POS invoice.
///
/// `original_invoice_no` is the vendor sequence number of the invoice a
/// credit note returns against. It is required when `invoice.is_return`.
pub fn build_sales_payload(
    invoice: &InvoiceSnapshot,
    rates: &TaxRates,
    original_invoice_no: Option<u64>,
) -> Result<SalesPayload, PayloadError> {
    let posted_at = posting_datetime(invoice.posting_date, &invoice.posting_time)?;
    let validated_date = posted_at.format("%Y%m%d%H%M%S").to_string();
    let sales_date = posted_at.format("%Y%m%d").to_string();

    let trade_name = if invoice.amended_from.is_some() {
        clean_invc_no(&invoice.name)
    } else {
        invoice.name.as_str()
    };

    let org_invc_no = if invoice.is_return {
        original_invoice_no.ok_or_else(|| {
            PayloadError::DataIntegrity(format!(
                "credit note {} returns against {} which has no vendor sequence number",
                invoice.name,
                invoice.return_against.as_deref().unwrap_or("an unknown invoice"),
            ))
        })?
    } else {
        0
    };

    let taxes = TaxBreakdown::aggregate(invoice.items.iter().map(InvoiceLine::tax_line), rates);
    let item_list: Vec<SalesItem> = invoice.items.iter().map(sales_item).collect();
    let cust_tin = invoice.tax_id.clone().filter(|tin| !tin.is_empty());

    Ok(SalesPayload {
        invc_no: get_invoice_number(trade_name)?,
        org_invc_no,
        trd_invc_no: trade_name.to_string(),
        cust_tin: cust_tin.clone(),
        cust_nm: None,
        rcpt_ty_cd: receipt_type_code(invoice.is_return).to_string(),
        pmt_ty_cd: invoice.payment_type_code.clone(),
        sales_stts_cd: invoice.transaction_progress_code.clone(),
        cfm_dt: validated_date.clone(),
        sales_dt: sales_date,
        stock_rls_dt: Some(validated_date.clone()),
        cncl_req_dt: None,
        cncl_dt: None,
        rfd_dt: None,
        rfd_rsn_cd: None,
        tot_item_cnt: item_list.len(),
        taxes: taxes.summary(),
        tot_taxbl_amt: quantize(invoice.base_net_total),
        tot_tax_amt: quantize(invoice.total_taxes_and_charges),
        tot_amt: quantize(invoice.grand_total),
        prchr_acptc_yn: YES.to_string(),
        remark: None,
        registrant: Registrant::new(&invoice.owner, &invoice.modified_by),
        receipt: Receipt {
            cust_tin,
            cust_mbl_no: None,
            rpt_no: 1,
            rcpt_pbct_dt: validated_date,
            trde_nm: String::new(),
            adrs: String::new(),
            top_msg: RECEIPT_TOP_MESSAGE.to_string(),
            btm_msg: String::new(),
            prchr_acptc_yn: YES.to_string(),
        },
        item_list,
    })
}

fn sales_item(line: &InvoiceLine) -> SalesItem {
    SalesItem {
        item_seq: line.idx,
        item_cd: line.etims_item_code.clone(),
        item_cls_cd: line.item_classification.clone(),
        item_nm: line.item_name.clone(),
        bcd: line.barcode.clone(),
        pkg_unit_cd: line.packaging_unit_code.clone(),
        pkg: 1,
        qty_unit_cd: line.quantity_unit_code.clone(),
        qty: line.qty.abs(),
        prc: quantize(line.base_rate),
        sply_amt: quantize(line.base_amount),
        dc_rt: quantize(line.discount_percentage),
        dc_amt: quantize(line.discount_amount),
        isrcc_cd: None,
        isrcc_nm: None,
        isrc_rt: None,
        isrc_amt: None,
        tax_ty_cd: line.taxation_type.to_string(),
        taxbl_amt: quantize(line.net_amount),
        tax_amt: quantize(line.tax_amount),
        tot_amt: quantize(line.net_amount + line.tax_amount),
    }
}

#[cfg(test)]
#[path = "invoice_tests.rs"]
mod tests;
