//! Reference data the payload builders read: tax rates and warehouse branches.

use async_trait::async_trait;
use chrono::Utc;
use etims_core::codelist::CodeCategory;
use etims_core::payload::{TaxBucket, TaxRates, WarehouseBranches};
use etims_core::store::StoreError;
use etims_core::submission::ReferenceData;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::backend;
use crate::entities::{reference_codes, warehouses};

/// Reference data repository.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    db: DatabaseConnection,
}

impl ReferenceRepository {
    /// Creates a new reference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records which branch a warehouse reports under.
    ///
    /// # Errors
    ///
    /// Returns an error if the database upsert fails.
    pub async fn upsert_warehouse(&self, name: &str, company: &str, branch: &str) -> Result<(), StoreError> {
        let model = warehouses::ActiveModel {
            name: Set(name.to_string()),
            company: Set(company.to_string()),
            branch: Set(branch.to_string()),
            updated_at: Set(Utc::now().into()),
        };

        warehouses::Entity::insert(model)
            .on_conflict(
                OnConflict::column(warehouses::Column::Name)
                    .update_columns([
                        warehouses::Column::Company,
                        warehouses::Column::Branch,
                        warehouses::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(backend)?;

        tracing::info!(warehouse = name, branch, "Mapped warehouse to branch");
        Ok(())
    }
}

/// Rate of a taxation type row; the vendor puts it in the first user field.
fn parse_rate(row: &reference_codes::Model) -> Option<(TaxBucket, Decimal)> {
    let bucket = TaxBucket::ALL.into_iter().find(|b| b.as_str() == row.code)?;
    let rate = row.user_defined_1.as_deref()?.trim().parse::<Decimal>().ok()?;
    Some((bucket, rate))
}

#[async_trait]
impl ReferenceData for ReferenceRepository {
    async fn taxation_rates(&self) -> Result<TaxRates, StoreError> {
        let rows = reference_codes::Entity::find()
            .filter(reference_codes::Column::Category.eq(CodeCategory::TaxationType.as_str()))
            .all(&self.db)
            .await
            .map_err(backend)?;

        let rates: TaxRates = rows.iter().filter_map(parse_rate).collect();
        if rates.is_empty() {
            tracing::warn!("No taxation type rates mirrored yet");
        }
        Ok(rates)
    }

    async fn warehouse_branches(&self, names: &[String]) -> Result<WarehouseBranches, StoreError> {
        if names.is_empty() {
            return Ok(WarehouseBranches::new());
        }

        Ok(warehouses::Entity::find()
            .filter(warehouses::Column::Name.is_in(names.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(|w| (w.name, w.branch))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(code: &str, rate: Option<&str>) -> reference_codes::Model {
        reference_codes::Model {
            category: CodeCategory::TaxationType.as_str().to_string(),
            code: code.to_string(),
            name: format!("Taxable {code}"),
            description: None,
            sort_order: None,
            in_use: true,
            user_defined_1: rate.map(str::to_string),
            user_defined_2: None,
            user_defined_3: None,
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate(&row("B", Some("16"))), Some((TaxBucket::B, dec!(16))));
        assert_eq!(parse_rate(&row("E", Some(" 8.00 "))), Some((TaxBucket::E, dec!(8))));
    }

    #[test]
    fn test_parse_rate_skips_unusable_rows() {
        assert_eq!(parse_rate(&row("F", Some("16"))), None);
        assert_eq!(parse_rate(&row("A", None)), None);
        assert_eq!(parse_rate(&row("A", Some("exempt"))), None);
    }
}
