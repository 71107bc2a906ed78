//! ERP lifecycle webhooks and manual triggers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use etims_core::integration::dispatch_json;
use etims_core::submission::DocumentKind;
use serde_json::Value;
use tracing::info;

use super::parse_segment;
use crate::{AppState, error::ApiResult};

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents/{kind}", post(document_event))
        .route("/documents/{kind}/{name}/cancel", post(cancel_document))
        .route("/documents/{kind}/{name}/submit", post(submit_document))
}

/// POST `/documents/{kind}` - Store the snapshot and trigger its submission.
async fn document_event(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let kind: DocumentKind = parse_segment(&kind)?;
    let dispatch = state.service.handle_event(kind, body).await?;
    info!(kind = kind.slug(), status = dispatch.status(), "Document event handled");
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}

/// POST `/documents/{kind}/{name}/cancel` - Record an ERP cancellation.
async fn cancel_document(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let kind: DocumentKind = parse_segment(&kind)?;
    state.service.cancel(kind, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/documents/{kind}/{name}/submit` - Re-trigger a stored document.
async fn submit_document(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let kind: DocumentKind = parse_segment(&kind)?;
    let dispatch = state.service.submit(kind, &name).await?;
    Ok((StatusCode::ACCEPTED, Json(dispatch_json(&dispatch))))
}
