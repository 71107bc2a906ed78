//! Item registration, item codes and compositions.

use etims_shared::quantize;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PayloadError;
use super::series::split_user_email;
use super::stock::ItemIndex;
use super::types::ItemSnapshot;
use super::wire::{CompositionPayload, ItemPayload, Registrant, YES};

/// Width of the numeric suffix of an item code.
pub const ITEM_CODE_SUFFIX_LEN: usize = 7;

/// `{country}{product type}{packaging unit}{quantity unit}`, when all four are set.
#[must_use]
pub fn item_code_prefix(item: &ItemSnapshot) -> Option<String> {
    let parts = [
        item.country_of_origin_code.as_deref(),
        item.product_type.as_deref(),
        item.packaging_unit_code.as_deref(),
        item.quantity_unit_code.as_deref(),
    ];
    parts
        .into_iter()
        .map(|part| part.filter(|p| !p.is_empty()))
        .collect::<Option<Vec<_>>>()
        .map(|parts| parts.concat())
}

/// Numeric suffix of an existing item code.
#[must_use]
pub fn item_code_suffix(code: &str) -> Option<u32> {
    let start = code.len().checked_sub(ITEM_CODE_SUFFIX_LEN)?;
    code.get(start..)?.parse().ok()
}

/// Computes the eTIMS item code.
///
/// An item that already has a code keeps its suffix under the current
/// prefix. Otherwise the suffix is one past `highest_suffix`, the largest
/// suffix already issued for the item's classification. Returns `None`
/// while any prefix component is missing.
#[must_use]
pub fn assign_item_code(item: &ItemSnapshot, highest_suffix: Option<u32>) -> Option<String> {
    let prefix = item_code_prefix(item)?;
    let suffix = match item.etims_item_code.as_deref().and_then(item_code_suffix) {
        Some(existing) => existing,
        None => highest_suffix.map_or(1, |n| n.saturating_add(1)),
    };
    Some(format!("{prefix}{suffix:0width$}", width = ITEM_CODE_SUFFIX_LEN))
}

/// Builds the `/ItemSaveReq` body.
pub fn build_item_payload(item: &ItemSnapshot) -> Result<ItemPayload, PayloadError> {
    let item_cd = item.etims_item_code.clone().ok_or_else(|| {
        PayloadError::DataIntegrity(format!(
            "item {} has no eTIMS item code; set origin, product type and units first",
            item.name
        ))
    })?;

    Ok(ItemPayload {
        item_cd,
        item_cls_cd: item.item_classification.clone(),
        item_ty_cd: item.product_type.clone(),
        item_nm: item.item_name.clone(),
        orgn_nat_cd: item.country_of_origin_code.clone(),
        pkg_unit_cd: item.packaging_unit_code.clone(),
        qty_unit_cd: item.quantity_unit_code.clone(),
        tax_ty_cd: item.taxation_type.to_string(),
        dft_prc: quantize(item.valuation_rate),
        isrc_aplcb_yn: YES.to_string(),
        use_yn: YES.to_string(),
        registrant: Registrant::new(&item.owner, &item.modified_by),
    })
}

/// One component line of a bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionComponent {
    /// ERP item code of the component.
    pub item_code: String,
    /// Quantity per manufactured unit.
    pub qty: Decimal,
}

/// A bill of materials to report as an item composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRequest {
    /// Bill of materials name.
    pub name: String,
    /// Owning company.
    pub company: String,
    /// ERP item code of the manufactured item.
    pub item: String,
    /// E-mail of the user registering the composition.
    pub registered_by: String,
    /// Components.
    pub items: Vec<CompositionComponent>,
}

/// Builds one `/SaveItemComposition` body per component.
///
/// Every item must already carry an eTIMS code.
pub fn build_composition_payloads(
    request: &CompositionRequest,
    items: &ItemIndex,
) -> Result<Vec<CompositionPayload>, PayloadError> {
    let etims_code = |code: &str| {
        items
            .get(code)
            .and_then(|item| item.etims_item_code.clone())
            .ok_or_else(|| {
                PayloadError::DataIntegrity(format!("item {code} is not registered with eTIMS"))
            })
    };

    let item_cd = etims_code(&request.item)?;
    let regr_id = split_user_email(&request.registered_by).to_string();

    request
        .items
        .iter()
        .map(|component| {
            Ok(CompositionPayload {
                item_cd: item_cd.clone(),
                cpst_item_cd: etims_code(&component.item_code)?,
                cpst_qty: component.qty,
                regr_id: regr_id.clone(),
                regr_nm: request.registered_by.clone(),
            })
        })
        .collect()
}
