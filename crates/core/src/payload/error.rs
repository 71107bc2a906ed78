//! Payload construction errors.

use thiserror::Error;

/// Errors raised while turning a document snapshot into a request body.
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    /// A name, date or field did not match the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    /// A referenced master record or line is missing.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}
