//! Settings management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use etims_core::settings::{EtimsSettings, SettingsDraft};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiResult};

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings).post(create_settings))
        .route("/settings/{id}", get(get_settings).put(update_settings))
        .route("/settings/{id}/activate", post(activate_settings))
}

/// Query parameters for listing settings.
#[derive(Debug, Deserialize)]
pub struct ListSettingsQuery {
    /// Restrict to one company.
    pub company: Option<String>,
}

/// A settings record as returned to clients.
///
/// Credentials never leave the server; only the presence of the
/// communication key is reported.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    #[serde(flatten)]
    settings: EtimsSettings,
    has_communication_key: bool,
}

impl From<EtimsSettings> for SettingsView {
    fn from(settings: EtimsSettings) -> Self {
        let has_communication_key = settings.communication_key.is_some();
        Self {
            settings,
            has_communication_key,
        }
    }
}

/// POST `/settings` - Create a settings record and initialize the device.
async fn create_settings(
    State(state): State<AppState>,
    Json(draft): Json<SettingsDraft>,
) -> ApiResult<impl IntoResponse> {
    let created = state.settings.create(draft).await?;
    info!(settings_id = %created.id, company = %created.company, bhfid = %created.bhfid, "Settings created");
    Ok((StatusCode::CREATED, Json(SettingsView::from(created))))
}

/// PUT `/settings/{id}` - Replace a settings record.
async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<SettingsDraft>,
) -> ApiResult<Json<SettingsView>> {
    let updated = state.settings.update(id, draft).await?;
    info!(settings_id = %id, "Settings updated");
    Ok(Json(updated.into()))
}

/// POST `/settings/{id}/activate` - Make a record the active one for its branch.
async fn activate_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SettingsView>> {
    let activated = state.settings.activate(id).await?;
    info!(settings_id = %id, "Settings activated");
    Ok(Json(activated.into()))
}

async fn get_settings(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<SettingsView>> {
    Ok(Json(state.settings.get(id).await?.into()))
}

async fn list_settings(
    State(state): State<AppState>,
    Query(query): Query<ListSettingsQuery>,
) -> ApiResult<Json<Vec<SettingsView>>> {
    let records = state.settings.list(query.company.as_deref()).await?;
    Ok(Json(records.into_iter().map(SettingsView::from).collect()))
}
