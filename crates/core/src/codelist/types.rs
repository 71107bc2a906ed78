//! Mirrored vendor reference data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::PayloadError;

/// Code-list categories the bridge mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeCategory {
    /// Units of quantity.
    QuantityUnit,
    /// Taxation types; `userDfnCd1` carries the rate.
    TaxationType,
    /// Packaging units.
    PackingUnit,
    /// Countries of origin.
    Country,
}

impl CodeCategory {
    /// Every category.
    pub const ALL: [Self; 4] = [
        Self::QuantityUnit,
        Self::TaxationType,
        Self::PackingUnit,
        Self::Country,
    ];

    /// Vendor `cdClsNm`, also the stored category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::QuantityUnit => "Quantity Unit",
            Self::TaxationType => "Taxation Type",
            Self::PackingUnit => "Packing Unit",
            Self::Country => "Country",
        }
    }
}

impl fmt::Display for CodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unmirrored code class: {s}"))
    }
}

/// One entry of a vendor code list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCode {
    /// Category.
    pub category: CodeCategory,
    /// `cd`, unique within the category.
    pub code: String,
    /// `cdNm`.
    pub name: String,
    /// `cdDesc`.
    pub description: Option<String>,
    /// `srtOrd`.
    pub sort_order: Option<i32>,
    /// `useYn == "Y"`.
    pub in_use: bool,
    /// `userDfnCd1`, the rate of a taxation type.
    pub user_defined_1: Option<String>,
    /// `userDfnCd2`.
    pub user_defined_2: Option<String>,
    /// `userDfnCd3`.
    pub user_defined_3: Option<String>,
}

impl ReferenceCode {
    /// Reads a `dtlList` entry.
    pub fn from_vendor(category: CodeCategory, entry: &Value) -> Result<Self, PayloadError> {
        let code = text(entry, "cd")
            .ok_or_else(|| PayloadError::Format(format!("{category} entry without cd: {entry}")))?;
        Ok(Self {
            category,
            name: text(entry, "cdNm").unwrap_or_default(),
            description: text(entry, "cdDesc"),
            sort_order: integer(entry, "srtOrd"),
            in_use: yes(entry, "useYn"),
            user_defined_1: text(entry, "userDfnCd1"),
            user_defined_2: text(entry, "userDfnCd2"),
            user_defined_3: text(entry, "userDfnCd3"),
            code,
        })
    }
}

/// One entry of the item classification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemClassification {
    /// `itemClsCd`.
    pub code: String,
    /// `itemClsNm`.
    pub name: String,
    /// `itemClsLvl`.
    pub level: Option<i32>,
    /// `taxTyCd`.
    pub tax_type: Option<String>,
    /// `mjrTgYn == "Y"`.
    pub major_target: bool,
    /// `useYn == "Y"`.
    pub in_use: bool,
}

impl ItemClassification {
    /// Reads an `itemClsList` entry.
    pub fn from_vendor(entry: &Value) -> Result<Self, PayloadError> {
        let code = text(entry, "itemClsCd").ok_or_else(|| {
            PayloadError::Format(format!("item classification without itemClsCd: {entry}"))
        })?;
        Ok(Self {
            code,
            name: text(entry, "itemClsNm").unwrap_or_default(),
            level: integer(entry, "itemClsLvl"),
            tax_type: text(entry, "taxTyCd"),
            major_target: yes(entry, "mjrTgYn"),
            in_use: yes(entry, "useYn"),
        })
    }
}

/// Search results mirrored locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorKind {
    /// `/NoticeSearchReq`
    Notice,
    /// `/BhfSearchReq`
    Branch,
    /// `/ImportItemSearchReq`
    ImportedItem,
    /// `/StockMoveReq`
    StockMovement,
}

impl MirrorKind {
    /// Key of the result list inside `data`.
    #[must_use]
    pub const fn list_key(&self) -> &'static str {
        match self {
            Self::Notice => "noticeList",
            Self::Branch => "bhfList",
            Self::ImportedItem => "itemList",
            Self::StockMovement => "stockList",
        }
    }

    /// Fields forming the natural key of a row.
    #[must_use]
    pub const fn key_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Notice => &["noticeNo"],
            Self::Branch => &["tin", "bhfId"],
            Self::ImportedItem => &["taskCd", "dclDe", "itemSeq"],
            Self::StockMovement => &["custTin", "custBhfId", "sarNo"],
        }
    }

    /// Storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notices",
            Self::Branch => "branches",
            Self::ImportedItem => "imported_items",
            Self::StockMovement => "stock_movements",
        }
    }
}

/// A search result row keyed by its natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorRecord {
    /// Natural key fields joined with `-`.
    pub key: String,
    /// The vendor row as returned.
    pub data: Value,
}

impl MirrorRecord {
    /// Keys a vendor row. Rows missing a key field are rejected.
    pub fn from_vendor(kind: MirrorKind, row: &Value) -> Result<Self, PayloadError> {
        let parts = kind
            .key_fields()
            .iter()
            .map(|field| {
                text(row, field).ok_or_else(|| {
                    PayloadError::Format(format!("{} row without {field}: {row}", kind.as_str()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            key: parts.join("-"),
            data: row.clone(),
        })
    }
}

fn text(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer(entry: &Value, key: &str) -> Option<i32> {
    match entry.get(key)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn yes(entry: &Value, key: &str) -> bool {
    entry.get(key).and_then(Value::as_str) == Some("Y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_code_from_vendor() {
        let code = ReferenceCode::from_vendor(
            CodeCategory::TaxationType,
            &json!({
                "cd": "B", "cdNm": "B-16.00%", "cdDesc": "VAT", "useYn": "Y",
                "srtOrd": 2, "userDfnCd1": "16", "userDfnCd2": null
            }),
        )
        .unwrap();

        assert_eq!(code.code, "B");
        assert_eq!(code.sort_order, Some(2));
        assert!(code.in_use);
        assert_eq!(code.user_defined_1.as_deref(), Some("16"));
        assert_eq!(code.user_defined_2, None);
    }

    #[test]
    fn test_reference_code_requires_cd() {
        let err = ReferenceCode::from_vendor(CodeCategory::Country, &json!({"cdNm": "KENYA"}));
        assert!(matches!(err, Err(PayloadError::Format(_))));
    }

    #[test]
    fn test_item_classification_from_vendor() {
        let class = ItemClassification::from_vendor(&json!({
            "itemClsCd": "5020230500", "itemClsNm": "Soft drinks", "itemClsLvl": "4",
            "taxTyCd": "B", "mjrTgYn": "N", "useYn": "Y"
        }))
        .unwrap();
        assert_eq!(class.level, Some(4));
        assert!(!class.major_target);
        assert!(class.in_use);
    }

    #[test]
    fn test_mirror_keys() {
        let row = json!({"taskCd": "2231943", "dclDe": "20240315", "itemSeq": 1});
        let record = MirrorRecord::from_vendor(MirrorKind::ImportedItem, &row).unwrap();
        assert_eq!(record.key, "2231943-20240315-1");

        assert!(MirrorRecord::from_vendor(MirrorKind::Notice, &json!({"title": "x"})).is_err());
    }

    #[test]
    fn test_category_names() {
        assert_eq!("Packing Unit".parse::<CodeCategory>(), Ok(CodeCategory::PackingUnit));
        assert!("Bank".parse::<CodeCategory>().is_err());
    }
}
