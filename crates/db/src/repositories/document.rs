//! Mirrored ERP document repository.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use etims_core::integration::service::ITEM_CODE_FIELD;
use etims_core::payload::item::ITEM_CODE_SUFFIX_LEN;
use etims_core::store::StoreError;
use etims_core::submission::{
    DOCSTATUS_SUBMITTED, DocumentKind, DocumentStore, StoredDocument, SubmissionFlag,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Statement,
};
use serde_json::{Map, Value};

use super::backend;
use crate::entities::documents;

const UPSERT_SQL: &str = r"
INSERT INTO documents (kind, name, company, docstatus, body, updated_at)
VALUES ($1, $2, $3, $4, $5, now())
ON CONFLICT (kind, name) DO UPDATE SET
    company = EXCLUDED.company,
    docstatus = EXCLUDED.docstatus,
    body = EXCLUDED.body,
    updated_at = now()
RETURNING *
";

const MARK_SUBMITTED_SQL: &str = r"
UPDATE documents SET
    vendor_fields = vendor_fields || $3::jsonb,
    submitted = submitted OR $4,
    inventory_submitted = inventory_submitted OR $5,
    updated_at = now()
WHERE kind = $1 AND name = $2
";

const MERGE_FIELDS_SQL: &str = r"
UPDATE documents SET
    vendor_fields = vendor_fields || $3::jsonb,
    updated_at = now()
WHERE kind = $1 AND name = $2
";

/// Max item code suffix for one classification.
#[derive(Debug, FromQueryResult)]
struct SuffixRow {
    suffix: Option<i32>,
}

/// Document repository backed by `documents`.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: documents::Model) -> Result<StoredDocument, StoreError> {
        let kind: DocumentKind = model
            .kind
            .parse()
            .map_err(|e: String| StoreError::Backend(format!("document {}: {e}", model.name)))?;

        Ok(StoredDocument {
            kind,
            name: model.name,
            company: model.company,
            docstatus: model.docstatus,
            submitted: model.submitted,
            inventory_submitted: model.inventory_submitted,
            body: model.body,
            vendor_fields: model.vendor_fields,
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }

    async fn update_fields(
        &self,
        kind: DocumentKind,
        name: &str,
        stmt: Statement,
    ) -> Result<(), StoreError> {
        let result = self.db.execute(stmt).await.map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("{kind} {name}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn load(&self, kind: DocumentKind, name: &str) -> Result<Option<StoredDocument>, StoreError> {
        documents::Entity::find_by_id((kind.slug().to_string(), name.to_string()))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Self::to_domain)
            .transpose()
    }

    async fn upsert(
        &self,
        kind: DocumentKind,
        name: &str,
        company: &str,
        docstatus: i16,
        body: Value,
    ) -> Result<StoredDocument, StoreError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPSERT_SQL,
            [
                kind.slug().into(),
                name.into(),
                company.into(),
                docstatus.into(),
                body.into(),
            ],
        );

        let model = documents::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("upsert of {kind} {name} returned no row")))?;

        tracing::debug!(kind = kind.slug(), name, docstatus, "Mirrored document");
        Self::to_domain(model)
    }

    async fn pending(&self, kind: DocumentKind) -> Result<Vec<String>, StoreError> {
        documents::Entity::find()
            .select_only()
            .column(documents::Column::Name)
            .filter(documents::Column::Kind.eq(kind.slug()))
            .filter(documents::Column::Docstatus.eq(DOCSTATUS_SUBMITTED))
            .filter(documents::Column::Submitted.eq(false))
            .order_by_asc(documents::Column::UpdatedAt)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(backend)
    }

    async fn pending_inventory(&self) -> Result<Vec<String>, StoreError> {
        documents::Entity::find()
            .select_only()
            .column(documents::Column::Name)
            .filter(documents::Column::Kind.eq(DocumentKind::StockLedgerEntry.slug()))
            .filter(documents::Column::Submitted.eq(true))
            .filter(documents::Column::InventorySubmitted.eq(false))
            .order_by_asc(documents::Column::UpdatedAt)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(backend)
    }

    async fn filter_eligible(
        &self,
        kind: DocumentKind,
        names: &[String],
    ) -> Result<Vec<String>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let eligible: HashSet<String> = documents::Entity::find()
            .select_only()
            .column(documents::Column::Name)
            .filter(documents::Column::Kind.eq(kind.slug()))
            .filter(documents::Column::Name.is_in(names.iter().cloned()))
            .filter(documents::Column::Docstatus.eq(DOCSTATUS_SUBMITTED))
            .filter(documents::Column::Submitted.eq(false))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .collect();

        // Keep the caller's order.
        Ok(names.iter().filter(|n| eligible.contains(*n)).cloned().collect())
    }

    async fn mark_submitted(
        &self,
        kind: DocumentKind,
        name: &str,
        flag: SubmissionFlag,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            MARK_SUBMITTED_SQL,
            [
                kind.slug().into(),
                name.into(),
                Value::Object(fields).into(),
                (flag == SubmissionFlag::Submitted).into(),
                (flag == SubmissionFlag::InventorySubmitted).into(),
            ],
        );
        self.update_fields(kind, name, stmt).await
    }

    async fn merge_vendor_fields(
        &self,
        kind: DocumentKind,
        name: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            MERGE_FIELDS_SQL,
            [kind.slug().into(), name.into(), Value::Object(fields).into()],
        );
        self.update_fields(kind, name, stmt).await
    }

    async fn max_item_code_suffix(&self, classification: &str) -> Result<Option<u32>, StoreError> {
        let sql = format!(
            r"
SELECT MAX(CAST(RIGHT(vendor_fields->>'{ITEM_CODE_FIELD}', {ITEM_CODE_SUFFIX_LEN}) AS INTEGER)) AS suffix
FROM documents
WHERE kind = $1
  AND body->>'item_classification' = $2
  AND vendor_fields->>'{ITEM_CODE_FIELD}' ~ '[0-9]{{{ITEM_CODE_SUFFIX_LEN}}}$'
"
        );
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [DocumentKind::Item.slug().into(), classification.into()],
        );

        let row = SuffixRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(row.and_then(|r| r.suffix).and_then(|s| u32::try_from(s).ok()))
    }
}
