//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - ERP lifecycle webhooks and manual submission triggers
//! - Settings management and registry operations
//! - Audit trail and error log queries
//! - JSON error responses

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use etims_core::audit::AuditRecorder;
use etims_core::client::{ClientFactory, ClientProvider, MokaClientCache};
use etims_core::integration::{EtimsPorts, EtimsService};
use etims_core::remote::LaneBudgets;
use etims_core::settings::{Environment, SettingsError, SettingsService};
use etims_db::{
    AuditRepository, DocumentRepository, ErrorLogRepository, MirrorRepository,
    ReferenceRepository, SettingsRepository,
};
use etims_shared::{AppError, AppResult, EtimsConfig};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Submission pipeline.
    pub service: EtimsService,
    /// Settings lifecycle.
    pub settings: SettingsService,
    /// Integration request queries.
    pub audit: AuditRepository,
    /// Error log queries.
    pub errors: ErrorLogRepository,
    /// Warehouse to branch mapping.
    pub reference: ReferenceRepository,
}

impl AppState {
    /// Wires the repositories, client provider and services over `db`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the configured environment
    /// is not recognized.
    pub fn new(
        db: DatabaseConnection,
        config: &EtimsConfig,
        factory: Arc<dyn ClientFactory>,
    ) -> AppResult<Self> {
        let environment: Environment = config
            .environment
            .parse()
            .map_err(|e: SettingsError| AppError::Configuration(e.to_string()))?;

        let settings_store = Arc::new(SettingsRepository::new(db.clone()));
        let audit = AuditRepository::new(db.clone());
        let errors = ErrorLogRepository::new(db.clone());
        let reference = ReferenceRepository::new(db.clone());

        let clients = ClientProvider::new(
            settings_store.clone(),
            factory,
            Arc::new(MokaClientCache::with_config(
                config.client_cache_capacity,
                config.client_ttl_secs,
            )),
            environment,
            Duration::from_secs(config.http_timeout_secs),
        );

        let ports = EtimsPorts {
            settings: settings_store.clone(),
            documents: Arc::new(DocumentRepository::new(db.clone())),
            reference: Arc::new(reference.clone()),
            mirror: Arc::new(MirrorRepository::new(db.clone())),
            audit: Arc::new(audit.clone()),
            errors: Arc::new(errors.clone()),
        };
        let budgets = LaneBudgets::from_secs(
            config.default_queue_timeout_secs,
            config.long_queue_timeout_secs,
        );
        let service = EtimsService::new(ports, clients.clone(), budgets, config.vendor.clone())
            .with_default_company(config.default_company.clone());
        let settings = SettingsService::new(
            settings_store,
            clients,
            AuditRecorder::new(Arc::new(audit.clone())),
        );

        tracing::info!(environment = %environment, vendor = %config.vendor, "Wired eTIMS pipeline");
        Ok(Self {
            db: Arc::new(db),
            service,
            settings,
            audit,
            errors,
            reference,
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
