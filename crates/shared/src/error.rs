//! Application-wide error types.
//!
//! Every layer maps its module error into `AppError` at the HTTP boundary.
//! The variants mirror the integration's error taxonomy: configuration and
//! validation problems are synchronous and user-facing, remote and transport
//! failures are captured inside background tasks.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or inactive settings for a tenant, branch and environment.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A precondition failed before submission was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The vendor answered with a non-success result code.
    #[error("Remote rejection ({code}): {message}")]
    RemoteRejection {
        /// Vendor result code.
        code: String,
        /// Vendor result message.
        message: String,
    },

    /// The SDK call itself failed (timeout, connection, unexpected shape).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A referenced master record is missing.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A document name or value did not match the expected format.
    #[error("Format error: {0}")]
    Format(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Configuration(_) => 412,
            Self::DataIntegrity(_) | Self::Format(_) => 422,
            Self::RemoteRejection { .. } | Self::Transport(_) => 502,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::RemoteRejection { .. } => "REMOTE_REJECTION",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::DataIntegrity(_) => "DATA_INTEGRITY_ERROR",
            Self::Format(_) => "FORMAT_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors the caller caused and can fix synchronously.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::Validation(_)
                | Self::NotFound(_)
                | Self::Conflict(_)
                | Self::Format(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
