//! Registry operations against the vendor: customers, users, insurances,
//! imported items, compositions and the search endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use etims_core::integration::dispatch_json;
use etims_core::payload::{
    BranchCustomerRegistration, BranchUserRegistration, CompositionRequest, CustomerLookup,
    ImportedItemUpdate, InsuranceRegistration,
};
use etims_core::remote::RemoteResponse;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiResult};

/// Creates the registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/registry/customer-search", post(customer_search))
        .route("/registry/branch-customers", post(branch_customer))
        .route("/registry/branch-users", post(branch_user))
        .route("/registry/insurances", post(insurance))
        .route("/registry/imported-items", post(imported_item))
        .route("/registry/item-compositions", post(item_composition))
        .route("/registry/branch-search", post(branch_search))
        .route("/registry/imported-item-search", post(imported_item_search))
        .route("/registry/notice-search", post(notice_search))
        .route("/registry/stock-movement-search", post(stock_movement_search))
}

/// Tenant and branch a search runs for.
#[derive(Debug, Deserialize)]
pub struct BranchTarget {
    /// Company name.
    pub company: String,
    /// Two-character branch id.
    pub branch: String,
}

async fn customer_search(
    State(state): State<AppState>,
    Json(lookup): Json<CustomerLookup>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.search_customer(lookup).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

async fn branch_customer(
    State(state): State<AppState>,
    Json(registration): Json<BranchCustomerRegistration>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.register_branch_customer(registration).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

/// POST `/registry/branch-users` - Register a user under a generated password.
///
/// The password appears in this response only.
async fn branch_user(
    State(state): State<AppState>,
    Json(registration): Json<BranchUserRegistration>,
) -> ApiResult<impl IntoResponse> {
    let ticket = state.service.register_branch_user(registration).await?;
    let mut body = dispatch_json(&ticket.dispatch);
    body["password"] = json!(ticket.password);
    Ok((StatusCode::ACCEPTED, Json(body)))
}

async fn insurance(
    State(state): State<AppState>,
    Json(registration): Json<InsuranceRegistration>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.register_insurance(registration).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

async fn imported_item(
    State(state): State<AppState>,
    Json(update): Json<ImportedItemUpdate>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.update_imported_item(update).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

async fn item_composition(
    State(state): State<AppState>,
    Json(request): Json<CompositionRequest>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.submit_composition(request).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

/// POST `/registry/branch-search` - Synchronous branch lookup.
async fn branch_search(
    State(state): State<AppState>,
    Json(target): Json<BranchTarget>,
) -> ApiResult<Json<RemoteResponse>> {
    Ok(Json(state.service.search_branches(&target.company, &target.branch).await?))
}

async fn imported_item_search(
    State(state): State<AppState>,
    Json(target): Json<BranchTarget>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.search_imported_items(&target.company, &target.branch).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

async fn notice_search(
    State(state): State<AppState>,
    Json(target): Json<BranchTarget>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.search_notices(&target.company, &target.branch).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

async fn stock_movement_search(
    State(state): State<AppState>,
    Json(target): Json<BranchTarget>,
) -> ApiResult<impl IntoResponse> {
    let dispatch = state.service.search_stock_movements(&target.company, &target.branch).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}
