//! Settings errors.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Errors from settings validation and lifecycle.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A field failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with this id.
    #[error("Settings not found: {0}")]
    NotFound(Uuid),

    /// OSCU initialization was refused or could not be performed.
    #[error("OSCU initialization failed: {0}")]
    Initialization(String),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
