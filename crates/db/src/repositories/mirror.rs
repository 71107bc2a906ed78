//! Mirror tables for data pulled from the vendor, plus route cursors.
//!
//! Upserts compare the incoming row against the stored one and only write
//! when something differs, so `rows_affected` counts inserted or changed
//! rows and a replay of identical data reports zero.

use async_trait::async_trait;
use chrono::Utc;
use etims_core::codelist::{
    CodeCategory, ItemClassification, MirrorKind, MirrorRecord, MirrorStore, ReferenceCode,
};
use etims_core::store::StoreError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement, TransactionTrait,
};

use super::backend;
use crate::entities::{item_classifications, reference_codes, route_cursors};

const UPSERT_CODE_SQL: &str = r"
INSERT INTO reference_codes
    (category, code, name, description, sort_order, in_use,
     user_defined_1, user_defined_2, user_defined_3, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
ON CONFLICT (category, code) DO UPDATE SET
    name = EXCLUDED.name,
    description = EXCLUDED.description,
    sort_order = EXCLUDED.sort_order,
    in_use = EXCLUDED.in_use,
    user_defined_1 = EXCLUDED.user_defined_1,
    user_defined_2 = EXCLUDED.user_defined_2,
    user_defined_3 = EXCLUDED.user_defined_3,
    updated_at = now()
WHERE (reference_codes.name, reference_codes.description, reference_codes.sort_order,
       reference_codes.in_use, reference_codes.user_defined_1,
       reference_codes.user_defined_2, reference_codes.user_defined_3)
    IS DISTINCT FROM
      (EXCLUDED.name, EXCLUDED.description, EXCLUDED.sort_order, EXCLUDED.in_use,
       EXCLUDED.user_defined_1, EXCLUDED.user_defined_2, EXCLUDED.user_defined_3)
";

const UPSERT_CLASS_SQL: &str = r"
INSERT INTO item_classifications (code, name, level, tax_type, major_target, in_use, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, now())
ON CONFLICT (code) DO UPDATE SET
    name = EXCLUDED.name,
    level = EXCLUDED.level,
    tax_type = EXCLUDED.tax_type,
    major_target = EXCLUDED.major_target,
    in_use = EXCLUDED.in_use,
    updated_at = now()
WHERE (item_classifications.name, item_classifications.level, item_classifications.tax_type,
       item_classifications.major_target, item_classifications.in_use)
    IS DISTINCT FROM
      (EXCLUDED.name, EXCLUDED.level, EXCLUDED.tax_type, EXCLUDED.major_target, EXCLUDED.in_use)
";

fn upsert_record_sql(table: &str) -> String {
    format!(
        r"
INSERT INTO {table} (company, record_key, data, created_at, updated_at)
VALUES ($1, $2, $3, now(), now())
ON CONFLICT (company, record_key) DO UPDATE SET
    data = EXCLUDED.data,
    updated_at = now()
WHERE {table}.data IS DISTINCT FROM EXCLUDED.data
"
    )
}

/// Mirror repository.
#[derive(Debug, Clone)]
pub struct MirrorRepository {
    db: DatabaseConnection,
}

impl MirrorRepository {
    /// Creates a new mirror repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs `statements` in one transaction and sums the affected rows.
    async fn apply(&self, statements: Vec<Statement>) -> Result<u64, StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        let mut changed = 0;
        for stmt in statements {
            changed += txn.execute(stmt).await.map_err(backend)?.rows_affected();
        }
        txn.commit().await.map_err(backend)?;
        Ok(changed)
    }
}

#[async_trait]
impl MirrorStore for MirrorRepository {
    async fn upsert_codes(
        &self,
        category: CodeCategory,
        codes: &[ReferenceCode],
    ) -> Result<u64, StoreError> {
        let statements = codes
            .iter()
            .map(|code| {
                Statement::from_sql_and_values(
                    DbBackend::Postgres,
                    UPSERT_CODE_SQL,
                    [
                        category.as_str().into(),
                        code.code.clone().into(),
                        code.name.clone().into(),
                        code.description.clone().into(),
                        code.sort_order.into(),
                        code.in_use.into(),
                        code.user_defined_1.clone().into(),
                        code.user_defined_2.clone().into(),
                        code.user_defined_3.clone().into(),
                    ],
                )
            })
            .collect();

        let changed = self.apply(statements).await?;
        tracing::debug!(category = category.as_str(), received = codes.len(), changed, "Upserted code list");
        Ok(changed)
    }

    async fn upsert_item_classes(&self, classes: &[ItemClassification]) -> Result<u64, StoreError> {
        let statements = classes
            .iter()
            .map(|class| {
                Statement::from_sql_and_values(
                    DbBackend::Postgres,
                    UPSERT_CLASS_SQL,
                    [
                        class.code.clone().into(),
                        class.name.clone().into(),
                        class.level.into(),
                        class.tax_type.clone().into(),
                        class.major_target.into(),
                        class.in_use.into(),
                    ],
                )
            })
            .collect();

        let changed = self.apply(statements).await?;
        tracing::debug!(received = classes.len(), changed, "Upserted item classifications");
        Ok(changed)
    }

    async fn upsert_records(
        &self,
        kind: MirrorKind,
        company: &str,
        records: &[MirrorRecord],
    ) -> Result<u64, StoreError> {
        let sql = upsert_record_sql(kind.as_str());
        let statements = records
            .iter()
            .map(|record| {
                Statement::from_sql_and_values(
                    DbBackend::Postgres,
                    sql.as_str(),
                    [company.into(), record.key.clone().into(), record.data.clone().into()],
                )
            })
            .collect();

        self.apply(statements).await
    }

    async fn codes(&self, category: CodeCategory) -> Result<Vec<ReferenceCode>, StoreError> {
        let rows = reference_codes::Entity::find()
            .filter(reference_codes::Column::Category.eq(category.as_str()))
            .order_by_asc(reference_codes::Column::SortOrder)
            .order_by_asc(reference_codes::Column::Code)
            .all(&self.db)
            .await
            .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|row| ReferenceCode {
                category,
                code: row.code,
                name: row.name,
                description: row.description,
                sort_order: row.sort_order,
                in_use: row.in_use,
                user_defined_1: row.user_defined_1,
                user_defined_2: row.user_defined_2,
                user_defined_3: row.user_defined_3,
            })
            .collect())
    }

    async fn record_cursor(&self, route: &str, last_req_dt: &str) -> Result<(), StoreError> {
        let model = route_cursors::ActiveModel {
            route: Set(route.to_string()),
            last_req_dt: Set(last_req_dt.to_string()),
            updated_at: Set(Utc::now().into()),
        };

        route_cursors::Entity::insert(model)
            .on_conflict(
                OnConflict::column(route_cursors::Column::Route)
                    .update_columns([route_cursors::Column::LastReqDt, route_cursors::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn cursor(&self, route: &str) -> Result<Option<String>, StoreError> {
        Ok(route_cursors::Entity::find_by_id(route.to_string())
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(|c| c.last_req_dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sql_targets_kind_table() {
        let sql = upsert_record_sql(MirrorKind::Notice.as_str());
        assert!(sql.contains("INSERT INTO notices"));
        assert!(sql.contains("WHERE notices.data IS DISTINCT FROM EXCLUDED.data"));
    }
}
