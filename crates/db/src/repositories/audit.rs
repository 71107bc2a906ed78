//! Integration request (audit trail) repository.

use async_trait::async_trait;
use chrono::Utc;
use etims_core::audit::{AuditRecord, AuditStatus, AuditTrail, NewAuditRecord};
use etims_core::store::StoreError;
use etims_shared::types::{PageRequest, PageResponse};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use super::backend;
use crate::entities::integration_requests;

/// Filters for listing integration requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    /// Only records in this status.
    pub status: Option<AuditStatus>,
    /// Only records about this doctype.
    pub reference_doctype: Option<String>,
    /// Only records about this document.
    pub reference_name: Option<String>,
}

/// Audit trail repository backed by `integration_requests`.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: integration_requests::Model) -> Result<AuditRecord, StoreError> {
        let status: AuditStatus = model
            .status
            .parse()
            .map_err(|e: String| StoreError::Backend(format!("integration request {}: {e}", model.id)))?;

        Ok(AuditRecord {
            id: model.id,
            operation: model.operation,
            url: model.url,
            reference_doctype: model.reference_doctype,
            reference_name: model.reference_name,
            data: model.data,
            status,
            output: model.output,
            error: model.error,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }

    /// Gets one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: Uuid) -> Result<Option<AuditRecord>, StoreError> {
        integration_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Self::to_domain)
            .transpose()
    }

    /// Lists records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
        filter: &AuditFilter,
    ) -> Result<PageResponse<AuditRecord>, StoreError> {
        let mut query = integration_requests::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(integration_requests::Column::Status.eq(status.as_str()));
        }
        if let Some(doctype) = &filter.reference_doctype {
            query = query.filter(integration_requests::Column::ReferenceDoctype.eq(doctype.as_str()));
        }
        if let Some(name) = &filter.reference_name {
            query = query.filter(integration_requests::Column::ReferenceName.eq(name.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(backend)?;
        let rows = query
            .order_by_desc(integration_requests::Column::CreatedAt)
            .order_by_desc(integration_requests::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Self::to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResponse::new(rows, page, total))
    }
}

#[async_trait]
impl AuditTrail for AuditRepository {
    async fn open(&self, record: NewAuditRecord) -> Result<(), StoreError> {
        let now = Utc::now().into();
        integration_requests::ActiveModel {
            id: Set(record.id),
            operation: Set(record.operation.route().to_string()),
            url: Set(record.url),
            reference_doctype: Set(record.reference_doctype),
            reference_name: Set(record.reference_name),
            data: Set(record.data),
            status: Set(AuditStatus::Pending.as_str().to_string()),
            output: Set(None),
            error: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: AuditStatus,
        output: Option<String>,
        error: Option<String>,
    ) -> Result<(), StoreError> {
        // Only a pending record moves, so a record is finalized at most once.
        let result = integration_requests::Entity::update_many()
            .col_expr(integration_requests::Column::Status, Expr::value(status.as_str()))
            .col_expr(integration_requests::Column::Output, Expr::value(output))
            .col_expr(integration_requests::Column::Error, Expr::value(error))
            .col_expr(integration_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(integration_requests::Column::Id.eq(id))
            .filter(integration_requests::Column::Status.eq(AuditStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(backend)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("pending integration request {id}")));
        }
        Ok(())
    }
}
