//! Warehouse to branch mapping used by stock movements.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::put,
};
use etims_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

/// Creates the warehouse routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/warehouses/{name}", put(put_warehouse))
}

/// Branch assignment of a warehouse.
#[derive(Debug, Deserialize)]
pub struct WarehouseRequest {
    /// Owning company.
    pub company: String,
    /// Two-character branch id.
    pub branch: String,
}

/// PUT `/warehouses/{name}` - Assign a warehouse to a branch.
async fn put_warehouse(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<WarehouseRequest>,
) -> ApiResult<StatusCode> {
    if request.branch.len() != 2 {
        return Err(ApiError(AppError::Validation(format!(
            "branch id '{}' must be two characters",
            request.branch
        ))));
    }
    state
        .reference
        .upsert_warehouse(&name, &request.company, &request.branch)
        .await?;
    info!(warehouse = %name, branch = %request.branch, "Warehouse mapped");
    Ok(StatusCode::NO_CONTENT)
}
