//! Repository abstractions for data access.
//!
//! Each repository implements one of the storage ports declared by
//! `etims-core`, hiding the `SeaORM` details from the pipeline.

pub mod audit;
pub mod document;
pub mod error_log;
pub mod mirror;
pub mod reference;
pub mod settings;

pub use audit::{AuditFilter, AuditRepository};
pub use document::DocumentRepository;
pub use error_log::ErrorLogRepository;
pub use mirror::MirrorRepository;
pub use reference::ReferenceRepository;
pub use settings::SettingsRepository;

use etims_core::store::StoreError;
use sea_orm::DbErr;

/// Maps a database error onto the port error.
pub(crate) fn backend(err: DbErr) -> StoreError {
    match err {
        DbErr::RecordNotFound(what) => StoreError::NotFound(what),
        other => StoreError::Backend(other.to_string()),
    }
}
