//! Errors raised while talking to the vendor.

use thiserror::Error;

/// Failure of a vendor call before a result code could be read.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Token acquisition was refused.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Connection, TLS or HTTP-level failure.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The request exceeded the client timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The response body was not the expected envelope.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The request body could not be encoded.
    #[error("Could not encode request: {0}")]
    Encode(String),
}
