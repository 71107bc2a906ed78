//! Integration request audit trail and error log queries.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use etims_core::audit::AuditRecord;
use etims_core::handlers::ErrorEntry;
use etims_db::AuditFilter;
use etims_shared::AppError;
use etims_shared::types::{PageRequest, PageResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

/// Creates the audit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/integration-requests", get(list_requests))
        .route("/integration-requests/{id}", get(get_request))
        .route("/error-logs", get(list_errors))
}

/// Query parameters for the error log.
#[derive(Debug, Deserialize)]
pub struct ErrorLogQuery {
    /// Restrict to one document.
    pub reference_name: Option<String>,
}

/// GET `/integration-requests` - Paginated audit trail, newest first.
async fn list_requests(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(filter): Query<AuditFilter>,
) -> ApiResult<Json<PageResponse<AuditRecord>>> {
    Ok(Json(state.audit.list(&page, &filter).await?))
}

async fn get_request(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<AuditRecord>> {
    state
        .audit
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(AppError::NotFound(format!("integration request {id}"))))
}

/// GET `/error-logs` - Paginated error log, newest first.
async fn list_errors(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(query): Query<ErrorLogQuery>,
) -> ApiResult<Json<PageResponse<ErrorEntry>>> {
    Ok(Json(state.errors.list(&page, query.reference_name.as_deref()).await?))
}
