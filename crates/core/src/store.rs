//! Storage error shared by every persistence port.

use thiserror::Error;

/// Errors surfaced by port implementations backed by storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The backend failed (connection, constraint, serialization).
    #[error("Storage error: {0}")]
    Backend(String),
}
