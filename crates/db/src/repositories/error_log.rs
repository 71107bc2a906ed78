//! Error log repository.

use async_trait::async_trait;
use chrono::Utc;
use etims_core::handlers::{ErrorEntry, ErrorLog};
use etims_core::store::StoreError;
use etims_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::backend;
use crate::entities::error_logs;

/// Error log repository backed by `error_logs`.
#[derive(Debug, Clone)]
pub struct ErrorLogRepository {
    db: DatabaseConnection,
}

impl ErrorLogRepository {
    /// Creates a new error log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entries newest first, optionally for one document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
        reference_name: Option<&str>,
    ) -> Result<PageResponse<ErrorEntry>, StoreError> {
        let mut query = error_logs::Entity::find();
        if let Some(name) = reference_name {
            query = query.filter(error_logs::Column::ReferenceName.eq(name));
        }

        let total = query.clone().count(&self.db).await.map_err(backend)?;
        let rows = query
            .order_by_desc(error_logs::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(backend)?;

        let entries = rows
            .into_iter()
            .map(|row| ErrorEntry {
                id: row.id,
                title: row.title,
                category: row.category,
                message: row.message,
                route: row.route,
                reference_doctype: row.reference_doctype,
                reference_name: row.reference_name,
                created_at: row.created_at.with_timezone(&Utc),
            })
            .collect();
        Ok(PageResponse::new(entries, page, total))
    }
}

#[async_trait]
impl ErrorLog for ErrorLogRepository {
    async fn record(&self, entry: ErrorEntry) -> Result<(), StoreError> {
        error_logs::ActiveModel {
            id: Set(entry.id),
            title: Set(entry.title),
            category: Set(entry.category),
            message: Set(entry.message),
            route: Set(entry.route),
            reference_doctype: Set(entry.reference_doctype),
            reference_name: Set(entry.reference_name),
            created_at: Set(entry.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(backend)?;
        Ok(())
    }
}
