//! Document preconditions checked before anything is enqueued.

use rust_decimal::Decimal;

use super::document::{DOCSTATUS_CANCELLED, DocumentKind};
use super::error::SubmissionError;
use crate::payload::{InvoiceSnapshot, ItemIndex, PurchaseSnapshot, StockLedgerEntry};

/// Outcome of a precondition check that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Submit the document.
    Proceed,
    /// Leave the document alone.
    Skip(String),
}

impl Gate {
    fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }
}

/// Sales and POS invoices.
///
/// Only stock-updating, non-deferred, non-opening invoices are reported.
pub fn sales_invoice(invoice: &InvoiceSnapshot) -> Result<Gate, SubmissionError> {
    if !invoice.update_stock {
        return Ok(Gate::skip("invoice does not update stock"));
    }
    if invoice.defer_submission {
        return Ok(Gate::skip("submission is deferred"));
    }
    if invoice.is_opening != "No" {
        return Ok(Gate::skip("opening invoice"));
    }
    if invoice.branch.as_deref().is_none_or(str::is_empty) {
        return Err(SubmissionError::Validation(format!(
            "invoice {} has no branch set",
            invoice.name
        )));
    }
    Ok(Gate::Proceed)
}

/// Purchase invoices.
///
/// `items` must hold the master record of every line item.
pub fn purchase_invoice(
    invoice: &PurchaseSnapshot,
    items: &ItemIndex,
) -> Result<Gate, SubmissionError> {
    for line in &invoice.items {
        let Some(item) = items.get(&line.item_code) else {
            return Err(SubmissionError::Validation(format!(
                "item {} is not registered with eTIMS",
                line.item_code
            )));
        };
        if !item.registered {
            return Err(SubmissionError::Validation(format!(
                "item {} is not registered with eTIMS",
                line.item_code
            )));
        }
        if item.referenced_imported_item.is_some() && !item.imported_item_submitted {
            return Err(SubmissionError::Validation(format!(
                "imported item {} has not been submitted to eTIMS",
                line.item_code
            )));
        }
    }

    if invoice.is_return {
        return Ok(Gate::skip("debit notes are not reported"));
    }
    if !invoice.update_stock {
        return Ok(Gate::skip("invoice does not update stock"));
    }
    Ok(Gate::Proceed)
}

/// Stock ledger entries.
///
/// `sales_voucher_submitted` is the submission flag of the sales invoice that
/// produced the entry, when it was one.
pub fn stock_ledger_entry(
    entry: &StockLedgerEntry,
    sales_voucher_submitted: Option<bool>,
) -> Result<Gate, SubmissionError> {
    if entry.docstatus == DOCSTATUS_CANCELLED {
        return Ok(Gate::skip("entry is cancelled"));
    }
    if entry.actual_qty <= Decimal::ZERO {
        return Ok(Gate::skip("entry does not add stock"));
    }
    if sales_voucher_submitted == Some(false) {
        return Ok(Gate::skip("sales invoice has not been submitted yet"));
    }
    Ok(Gate::Proceed)
}

/// Refuses to cancel an invoice the vendor already accepted.
pub fn before_cancel(kind: DocumentKind, submitted: bool) -> Result<(), SubmissionError> {
    if !submitted {
        return Ok(());
    }
    let note = match kind {
        DocumentKind::SalesInvoice | DocumentKind::PosInvoice => "a Credit Note",
        DocumentKind::PurchaseInvoice => "a Debit Note",
        _ => return Ok(()),
    };
    Err(SubmissionError::Validation(format!(
        "This invoice has already been submitted to eTIMS and cannot be cancelled. \
         Create {note} instead."
    )))
}

#[cfg(test)]
#[path = "precondition_tests.rs"]
mod tests;
