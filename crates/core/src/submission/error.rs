//! Submission error taxonomy.

use thiserror::Error;

use crate::client::ClientError;
use crate::handlers::IntegrationError;
use crate::payload::PayloadError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Why an attempt could not be started or did not succeed.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Settings are missing or inactive for the branch.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A precondition failed before submission.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The vendor answered with a non-success result code.
    #[error("{message} (Code: {code})")]
    Rejection {
        /// `resultCd`.
        code: String,
        /// `resultMsg`.
        message: String,
    },

    /// The vendor call raised before a result code could be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A referenced master record was missing while building.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A document field did not have the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    /// The task exceeded its lane budget.
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A synchronous attempt failed and was already logged.
    #[error(transparent)]
    Attempt(#[from] IntegrationError),
}

impl SubmissionError {
    /// Short category name used in error logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Configuration",
            Self::Validation(_) => "Validation",
            Self::Rejection { .. } => "Remote Rejection",
            Self::Transport(_) => "Transport",
            Self::DataIntegrity(_) => "Data Integrity",
            Self::Format(_) => "Format",
            Self::Timeout(_) => "Timeout",
            Self::Store(_) => "Storage",
            Self::Attempt(e) => e.category,
        }
    }
}

impl From<PayloadError> for SubmissionError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Format(msg) => Self::Format(msg),
            PayloadError::DataIntegrity(msg) => Self::DataIntegrity(msg),
        }
    }
}

impl From<RemoteError> for SubmissionError {
    fn from(err: RemoteError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<ClientError> for SubmissionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Configuration(msg) | ClientError::Construction(msg) => {
                Self::Configuration(msg)
            }
            ClientError::Store(e) => Self::Store(e),
        }
    }
}
