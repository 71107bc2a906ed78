//! Branch registry and search payloads: customers, insurers, users,
//! imported items and the incremental `lastReqDt` queries.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::PayloadError;
use super::series::split_user_email;
use super::wire::{
    BranchCustomerPayload, BranchUserPayload, CustomerSearchRequest, ImportedItemUpdatePayload,
    InsurancePayload, Registrant, YES,
};

/// Length of generated branch user passwords.
pub const BRANCH_USER_PASSWORD_LEN: usize = 12;

/// Placeholder stored in audit snapshots instead of a password.
pub const REDACTED: &str = "[REDACTED]";

/// Longest customer number the vendor accepts.
const CUSTOMER_NO_LEN: usize = 14;

/// Full branch pull.
pub const BRANCH_SEARCH_SINCE: &str = "20240101000000";
/// Full code-list pull.
pub const CODE_LIST_SINCE: &str = "20200101000000";
/// Full item classification pull.
pub const ITEM_CLASS_SINCE: &str = "20230101000000";

/// Look-back windows, in days, of the rolling searches.
pub mod lookback {
    /// Imported items.
    pub const IMPORTED_ITEMS: i64 = 365;
    /// Notices.
    pub const NOTICES: i64 = 30;
    /// Stock movements.
    pub const STOCK_MOVEMENTS: i64 = 7;
}

/// `lastReqDt` for a rolling search: `now` minus `days`.
#[must_use]
pub fn last_request_date(now: NaiveDateTime, days: i64) -> String {
    (now - Duration::days(days))
        .format("%Y%m%d%H%M%S")
        .to_string()
}

fn default_branch() -> String {
    "00".to_string()
}

/// Customer PIN lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct CustomerLookup {
    /// Customer record the result is written back to.
    pub name: String,
    pub company: String,
    #[serde(default = "default_branch")]
    pub branch_id: String,
    pub tax_id: String,
}

impl CustomerLookup {
    /// `/CustSearchReq` body.
    #[must_use]
    pub fn payload(&self) -> CustomerSearchRequest {
        CustomerSearchRequest { cust_tin: self.tax_id.clone() }
    }
}

/// Insurer registration for a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct InsuranceRegistration {
    pub name: String,
    pub company: String,
    #[serde(default = "default_branch")]
    pub branch_id: String,
    pub insurance_code: String,
    pub insurance_name: String,
    pub premium_rate: Decimal,
    pub registration_id: String,
    pub modifier_id: String,
}

impl InsuranceRegistration {
    /// `/BhfInsuranceSaveReq` body. The premium rate is sent as a whole number.
    #[must_use]
    pub fn payload(&self) -> InsurancePayload {
        InsurancePayload {
            isrcc_cd: self.insurance_code.clone(),
            isrcc_nm: self.insurance_name.clone(),
            isrc_rt: self.premium_rate.round_dp(0),
            use_yn: YES.to_string(),
            registrant: Registrant::new(&self.registration_id, &self.modifier_id),
        }
    }
}

/// Customer registration for a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BranchCustomerRegistration {
    pub name: String,
    pub company: String,
    #[serde(default = "default_branch")]
    pub branch_id: String,
    pub customer_pin: String,
    pub customer_name: String,
    pub registration_id: String,
    pub modifier_id: String,
}

impl BranchCustomerRegistration {
    /// `/BhfCustSaveReq` body.
    #[must_use]
    pub fn payload(&self) -> BranchCustomerPayload {
        BranchCustomerPayload {
            cust_no: self.name.chars().take(CUSTOMER_NO_LEN).collect(),
            cust_tin: self.customer_pin.clone(),
            cust_nm: self.customer_name.clone(),
            adrs: None,
            tel_no: None,
            email: None,
            fax_no: None,
            use_yn: YES.to_string(),
            remark: None,
            registrant: Registrant::new(&self.registration_id, &self.modifier_id),
        }
    }
}

/// Branch user registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BranchUserRegistration {
    pub name: String,
    pub company: String,
    #[serde(default = "default_branch")]
    pub branch_id: String,
    pub user_id: String,
    pub full_names: String,
    pub registration_id: String,
    pub modifier_id: String,
}

impl BranchUserRegistration {
    /// `/BhfUserSaveReq` body with the given password.
    #[must_use]
    pub fn payload(&self, password: String) -> BranchUserPayload {
        BranchUserPayload {
            user_id: self.user_id.clone(),
            user_nm: self.full_names.clone(),
            pwd: password,
            adrs: None,
            cntc: None,
            auth_cd: None,
            remark: None,
            use_yn: YES.to_string(),
            registrant: Registrant::new(&self.registration_id, &self.modifier_id),
        }
    }
}

/// A fresh alphanumeric password for a branch user.
#[must_use]
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(BRANCH_USER_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// JSON snapshot of a branch user payload with the password masked.
#[must_use]
pub fn redacted_snapshot(payload: &BranchUserPayload) -> Value {
    let mut snapshot = serde_json::to_value(payload).unwrap_or(Value::Null);
    if let Some(pwd) = snapshot.get_mut("pwd") {
        *pwd = Value::String(REDACTED.to_string());
    }
    snapshot
}

/// Status update of a declared import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ImportedItemUpdate {
    /// Item record the result is written back to.
    pub name: String,
    pub company: String,
    #[serde(default = "default_branch")]
    pub branch_id: String,
    pub task_code: String,
    /// `YYYY-MM-DD HH:MM:SS[.ffffff]` or `YYYY-MM-DD`.
    pub declaration_date: String,
    pub item_sequence: u32,
    pub hs_code: String,
    pub item_classification_code: String,
    pub item_code: String,
    pub import_item_status: String,
    pub modified_by: String,
}

impl ImportedItemUpdate {
    /// `/ImportItemUpdateReq` body.
    pub fn payload(&self) -> Result<ImportedItemUpdatePayload, PayloadError> {
        Ok(ImportedItemUpdatePayload {
            task_cd: self.task_code.clone(),
            dcl_de: declaration_day(&self.declaration_date)?,
            item_seq: self.item_sequence,
            hs_cd: self.hs_code.clone(),
            item_cls_cd: self.item_classification_code.clone(),
            item_cd: self.item_code.clone(),
            impt_item_stts_cd: self.import_item_status.clone(),
            remark: None,
            modr_nm: self.modified_by.clone(),
            modr_id: split_user_email(&self.modified_by).to_string(),
        })
    }
}

/// Declaration date as `YYYYMMDD`.
pub fn declaration_day(raw: &str) -> Result<String, PayloadError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|at| at.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map(|day| day.format("%Y%m%d").to_string())
        .map_err(|e| PayloadError::Format(format!("declaration date '{raw}': {e}")))
}
