//! Client acquisition errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while resolving a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No active settings for the requested branch.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The client could not be constructed from valid settings.
    #[error("Client construction failed: {0}")]
    Construction(String),

    /// Settings lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
