//! Bulk submission of selected documents.

use axum::{Json, Router, extract::State, routing::post};
use etims_core::submission::DocumentKind;
use etims_core::sweep::SweepReport;
use etims_shared::AppError;
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

/// Creates the bulk routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bulk/sales-invoices", post(bulk_sales_invoices))
        .route("/bulk/items", post(bulk_items))
}

/// Documents selected in the ERP list view.
#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    /// Document names.
    pub names: Vec<String>,
}

async fn bulk_sales_invoices(
    State(state): State<AppState>,
    Json(request): Json<BulkRequest>,
) -> ApiResult<Json<SweepReport>> {
    bulk(&state, DocumentKind::SalesInvoice, request).await
}

async fn bulk_items(State(state): State<AppState>, Json(request): Json<BulkRequest>) -> ApiResult<Json<SweepReport>> {
    bulk(&state, DocumentKind::Item, request).await
}

async fn bulk(state: &AppState, kind: DocumentKind, request: BulkRequest) -> ApiResult<Json<SweepReport>> {
    if request.names.is_empty() {
        return Err(ApiError(AppError::Validation("no documents selected".to_string())));
    }
    Ok(Json(state.service.bulk_submit(kind, &request.names).await?))
}
