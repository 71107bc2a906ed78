//! Request bodies in the vendor's exact field names.

use std::fmt;

use etims_shared::Amount;
use rust_decimal::Decimal;
use serde::Serialize;

use super::series::split_user_email;

/// `Y` flag used by the vendor for yes/no fields.
pub const YES: &str = "Y";

/// Per-bucket tax figures shared by sales and purchase payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TaxSummary {
    pub taxbl_amt_a: Amount,
    pub taxbl_amt_b: Amount,
    pub taxbl_amt_c: Amount,
    pub taxbl_amt_d: Amount,
    pub taxbl_amt_e: Amount,
    pub tax_rt_a: Decimal,
    pub tax_rt_b: Decimal,
    pub tax_rt_c: Decimal,
    pub tax_rt_d: Decimal,
    pub tax_rt_e: Decimal,
    pub tax_amt_a: Amount,
    pub tax_amt_b: Amount,
    pub tax_amt_c: Amount,
    pub tax_amt_d: Amount,
    pub tax_amt_e: Amount,
}

/// Registrant and modifier identities stamped on most payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Registrant {
    pub regr_id: String,
    pub regr_nm: String,
    pub modr_id: String,
    pub modr_nm: String,
}

impl Registrant {
    /// Stamps `owner` as registrant and `modifier` as modifier.
    #[must_use]
    pub fn new(owner: &str, modifier: &str) -> Self {
        Self {
            regr_id: split_user_email(owner).to_string(),
            regr_nm: owner.to_string(),
            modr_id: split_user_email(modifier).to_string(),
            modr_nm: modifier.to_string(),
        }
    }
}

/// `/selectInitOsdcInfo` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct DeviceInitRequest {
    pub tin: String,
    pub bhf_id: String,
    pub dvc_srl_no: Option<String>,
}

/// Sales or credit-note transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SalesPayload {
    pub invc_no: u64,
    pub org_invc_no: u64,
    pub trd_invc_no: String,
    pub cust_tin: Option<String>,
    pub cust_nm: Option<String>,
    pub rcpt_ty_cd: String,
    pub pmt_ty_cd: Option<String>,
    pub sales_stts_cd: Option<String>,
    pub cfm_dt: String,
    pub sales_dt: String,
    pub stock_rls_dt: Option<String>,
    pub cncl_req_dt: Option<String>,
    pub cncl_dt: Option<String>,
    pub rfd_dt: Option<String>,
    pub rfd_rsn_cd: Option<String>,
    pub tot_item_cnt: usize,
    #[serde(flatten)]
    pub taxes: TaxSummary,
    pub tot_taxbl_amt: Amount,
    pub tot_tax_amt: Amount,
    pub tot_amt: Amount,
    pub prchr_acptc_yn: String,
    pub remark: Option<String>,
    #[serde(flatten)]
    pub registrant: Registrant,
    pub receipt: Receipt,
    pub item_list: Vec<SalesItem>,
}

/// Receipt block of a sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Receipt {
    pub cust_tin: Option<String>,
    pub cust_mbl_no: Option<String>,
    pub rpt_no: u32,
    pub rcpt_pbct_dt: String,
    pub trde_nm: String,
    pub adrs: String,
    pub top_msg: String,
    pub btm_msg: String,
    pub prchr_acptc_yn: String,
}

/// Line of a sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SalesItem {
    pub item_seq: u32,
    pub item_cd: Option<String>,
    pub item_cls_cd: Option<String>,
    pub item_nm: String,
    pub bcd: Option<String>,
    pub pkg_unit_cd: Option<String>,
    pub pkg: u32,
    pub qty_unit_cd: Option<String>,
    pub qty: Decimal,
    pub prc: Amount,
    pub sply_amt: Amount,
    pub dc_rt: Amount,
    pub dc_amt: Amount,
    pub isrcc_cd: Option<String>,
    pub isrcc_nm: Option<String>,
    pub isrc_rt: Option<Decimal>,
    pub isrc_amt: Option<Amount>,
    pub tax_ty_cd: String,
    pub taxbl_amt: Amount,
    pub tax_amt: Amount,
    pub tot_amt: Amount,
}

/// Purchase transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct PurchasePayload {
    pub invc_no: u64,
    pub org_invc_no: u64,
    pub spplr_tin: Option<String>,
    pub spplr_bhf_id: Option<String>,
    pub spplr_nm: Option<String>,
    pub spplr_invc_no: Option<String>,
    pub reg_ty_cd: String,
    pub pchs_ty_cd: Option<String>,
    pub rcpt_ty_cd: Option<String>,
    pub pmt_ty_cd: Option<String>,
    pub pchs_stts_cd: Option<String>,
    pub cfm_dt: Option<String>,
    pub pchs_dt: String,
    pub wrhs_dt: Option<String>,
    pub cncl_req_dt: String,
    pub cncl_dt: String,
    pub rfd_dt: Option<String>,
    pub tot_item_cnt: usize,
    #[serde(flatten)]
    pub taxes: TaxSummary,
    pub tot_taxbl_amt: Amount,
    pub tot_tax_amt: Amount,
    pub tot_amt: Amount,
    pub remark: Option<String>,
    #[serde(flatten)]
    pub registrant: Registrant,
    pub item_list: Vec<PurchaseItem>,
}

/// Line of a purchase transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct PurchaseItem {
    pub item_seq: u32,
    pub item_cd: Option<String>,
    pub item_cls_cd: Option<String>,
    pub item_nm: String,
    pub bcd: String,
    pub spplr_item_cls_cd: Option<String>,
    pub spplr_item_cd: Option<String>,
    pub spplr_item_nm: Option<String>,
    pub pkg_unit_cd: Option<String>,
    pub pkg: u32,
    pub qty_unit_cd: Option<String>,
    pub qty: Decimal,
    pub prc: Amount,
    pub sply_amt: Amount,
    pub dc_rt: Amount,
    pub dc_amt: Amount,
    pub taxbl_amt: Amount,
    pub tax_ty_cd: String,
    pub tax_amt: Amount,
    pub tot_amt: Amount,
    pub item_expr_dt: Option<String>,
}

/// Stock in/out movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct StockMovementPayload {
    pub sar_no: u64,
    pub org_sar_no: u64,
    pub reg_ty_cd: String,
    pub cust_tin: Option<String>,
    pub cust_nm: Option<String>,
    pub cust_bhf_id: Option<String>,
    pub sar_ty_cd: String,
    pub ocrn_dt: String,
    pub tot_item_cnt: usize,
    pub tot_taxbl_amt: Amount,
    pub tot_tax_amt: Amount,
    pub tot_amt: Amount,
    pub remark: Option<String>,
    #[serde(flatten)]
    pub registrant: Registrant,
    pub item_list: Vec<StockItem>,
}

/// Line of a stock movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct StockItem {
    pub item_seq: u32,
    pub item_cd: Option<String>,
    pub item_cls_cd: Option<String>,
    pub item_nm: String,
    pub bcd: Option<String>,
    pub pkg_unit_cd: Option<String>,
    pub pkg: u32,
    pub qty_unit_cd: Option<String>,
    pub qty: Decimal,
    pub item_expr_dt: String,
    pub prc: Amount,
    pub sply_amt: Amount,
    pub tot_dc_amt: Amount,
    pub tax_ty_cd: String,
    pub taxbl_amt: Amount,
    pub tax_amt: Amount,
    pub tot_amt: Amount,
}

/// Residual quantity of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct StockMasterPayload {
    pub item_cd: String,
    pub rsd_qty: Decimal,
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Item registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ItemPayload {
    pub item_cd: String,
    pub item_cls_cd: Option<String>,
    pub item_ty_cd: Option<String>,
    pub item_nm: String,
    pub orgn_nat_cd: Option<String>,
    pub pkg_unit_cd: Option<String>,
    pub qty_unit_cd: Option<String>,
    pub tax_ty_cd: String,
    pub dft_prc: Amount,
    pub isrc_aplcb_yn: String,
    pub use_yn: String,
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Customer lookup by PIN.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct CustomerSearchRequest {
    #[serde(rename = "custmTin")]
    pub cust_tin: String,
}

/// Branch insurance registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct InsurancePayload {
    pub isrcc_cd: String,
    pub isrcc_nm: String,
    pub isrc_rt: Decimal,
    pub use_yn: String,
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Branch customer registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BranchCustomerPayload {
    pub cust_no: String,
    pub cust_tin: String,
    pub cust_nm: String,
    pub adrs: Option<String>,
    pub tel_no: Option<String>,
    pub email: Option<String>,
    pub fax_no: Option<String>,
    pub use_yn: String,
    pub remark: Option<String>,
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Branch user registration. `Debug` never prints the password.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BranchUserPayload {
    pub user_id: String,
    pub user_nm: String,
    pub pwd: String,
    pub adrs: Option<String>,
    pub cntc: Option<String>,
    pub auth_cd: Option<String>,
    pub remark: Option<String>,
    pub use_yn: String,
    #[serde(flatten)]
    pub registrant: Registrant,
}

impl fmt::Debug for BranchUserPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchUserPayload")
            .field("user_id", &self.user_id)
            .field("user_nm", &self.user_nm)
            .field("pwd", &"[REDACTED]")
            .field("use_yn", &self.use_yn)
            .finish_non_exhaustive()
    }
}

/// Incremental search keyed on the last request date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct LastRequestQuery {
    pub last_req_dt: String,
}

impl LastRequestQuery {
    /// Query with a `YYYYMMDDhhmmss` timestamp.
    #[must_use]
    pub fn new(last_req_dt: impl Into<String>) -> Self {
        Self {
            last_req_dt: last_req_dt.into(),
        }
    }
}

/// Imported item status update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ImportedItemUpdatePayload {
    pub task_cd: String,
    pub dcl_de: String,
    pub item_seq: u32,
    pub hs_cd: String,
    pub item_cls_cd: String,
    pub item_cd: String,
    pub impt_item_stts_cd: String,
    pub remark: Option<String>,
    pub modr_nm: String,
    pub modr_id: String,
}

/// One component of an item composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CompositionPayload {
    pub item_cd: String,
    pub cpst_item_cd: String,
    pub cpst_qty: Decimal,
    pub regr_id: String,
    pub regr_nm: String,
}
