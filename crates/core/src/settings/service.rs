//! Settings lifecycle: validation, OSCU initialization and activation.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use super::error::SettingsError;
use super::store::SettingsStore;
use super::types::{EtimsSettings, SettingsDraft};
use crate::audit::{AuditRecorder, AuditSlot, NewAuditRecord};
use crate::client::ClientProvider;
use crate::payload::wire::DeviceInitRequest;
use crate::remote::{Operation, RemoteResponse};

/// Doctype recorded on initialization audit rows.
const SETTINGS_DOCTYPE: &str = "eTIMS Settings";

/// Creates, updates and activates settings records.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    clients: ClientProvider,
    audit: AuditRecorder,
}

impl SettingsService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>, clients: ClientProvider, audit: AuditRecorder) -> Self {
        Self {
            store,
            clients,
            audit,
        }
    }

    /// Validates and persists a new record.
    ///
    /// Unless the draft asks to skip it, the device is initialized first and
    /// a refusal rejects the save. The record becomes active when requested
    /// or when its branch has no active record yet.
    pub async fn create(&self, draft: SettingsDraft) -> Result<EtimsSettings, SettingsError> {
        draft.validate()?;
        let skip = draft.skip_initialization;
        let mut settings = draft.into_settings(Utc::now());

        if skip {
            tracing::warn!(company = %settings.company, bhfid = %settings.bhfid, "Skipping OSCU initialization");
        } else {
            self.initialize_device(&mut settings).await?;
        }

        self.store.insert(&settings).await?;
        self.settle_activation(&mut settings).await?;
        self.clients.invalidate(&settings);

        tracing::info!(settings_id = %settings.id, company = %settings.company, active = settings.is_active, "Saved eTIMS settings");
        Ok(settings)
    }

    /// Applies a draft over an existing record.
    ///
    /// Initialization is not repeated; the stored communication key is kept.
    pub async fn update(&self, id: Uuid, draft: SettingsDraft) -> Result<EtimsSettings, SettingsError> {
        draft.validate()?;
        let mut settings = self.store.get(id).await?.ok_or(SettingsError::NotFound(id))?;

        // The previous branch key may differ from the new one.
        self.clients.invalidate(&settings);
        draft.apply_to(&mut settings, Utc::now());

        self.store.update(&settings).await?;
        self.settle_activation(&mut settings).await?;
        self.clients.invalidate(&settings);

        tracing::info!(settings_id = %id, active = settings.is_active, "Updated eTIMS settings");
        Ok(settings)
    }

    /// Makes `id` the active record of its branch.
    pub async fn activate(&self, id: Uuid) -> Result<EtimsSettings, SettingsError> {
        let mut settings = self.store.get(id).await?.ok_or(SettingsError::NotFound(id))?;
        self.store.activate(id).await?;
        settings.is_active = true;
        self.clients.invalidate(&settings);
        Ok(settings)
    }

    /// Record by id.
    pub async fn get(&self, id: Uuid) -> Result<EtimsSettings, SettingsError> {
        self.store.get(id).await?.ok_or(SettingsError::NotFound(id))
    }

    /// Records, optionally for one company.
    pub async fn list(&self, company: Option<&str>) -> Result<Vec<EtimsSettings>, SettingsError> {
        Ok(self.store.list(company).await?)
    }

    async fn settle_activation(&self, settings: &mut EtimsSettings) -> Result<(), SettingsError> {
        if settings.is_active {
            self.store.activate(settings.id).await?;
            return Ok(());
        }

        let active = self
            .store
            .count_active(&settings.company, settings.environment, &settings.bhfid)
            .await?;
        if active == 0 {
            self.store.activate(settings.id).await?;
            settings.is_active = true;
            tracing::info!(settings_id = %settings.id, "Auto-activated the only settings record for its branch");
        }
        Ok(())
    }

    async fn initialize_device(&self, settings: &mut EtimsSettings) -> Result<(), SettingsError> {
        let handle = self
            .clients
            .connect_uncached(settings)
            .map_err(|e| SettingsError::Initialization(e.to_string()))?;

        let request = DeviceInitRequest {
            tin: settings.tin.clone(),
            bhf_id: settings.bhfid.clone(),
            dvc_srl_no: settings.dvc_srl_no.clone(),
        };

        let slot = AuditSlot::new();
        let record = NewAuditRecord::new(
            handle.env_key(),
            Operation::InitializeDevice,
            json!({
                "tin": request.tin,
                "bhfId": request.bhf_id,
                "dvcSrlNo": request.dvc_srl_no,
                "env": handle.env_key(),
            }),
        )
        .referencing(Some(SETTINGS_DOCTYPE), Some(&settings.id.to_string()));
        self.audit.open(&slot, record).await?;

        match handle.api.select_init_osdc_info(&request).await {
            Ok(response @ RemoteResponse::Success { .. }) => {
                let info = response.data_field("info");
                let text = |key: &str| info.and_then(|i| i.get(key)).and_then(value_text);
                settings.communication_key = text("cmcKey");
                settings.scu_id = text("sdcId");

                self.audit
                    .complete(&slot, serde_json::to_string(&response).ok())
                    .await;
                tracing::info!(tin = %settings.tin, bhfid = %settings.bhfid, "OSCU device initialized");
                Ok(())
            }
            Ok(RemoteResponse::Rejection { code, message }) => {
                let error = format!("{message} (Code: {code})");
                self.audit.fail(&slot, error.clone()).await;
                Err(SettingsError::Initialization(error))
            }
            Err(e) => {
                self.audit.fail(&slot, e.to_string()).await;
                Err(SettingsError::Initialization(e.to_string()))
            }
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("clients", &self.clients)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
