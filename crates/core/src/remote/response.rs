//! Vendor response envelope, parsed once into a tagged outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::RemoteError;

/// Result code the vendor uses for success.
pub const SUCCESS_CODE: &str = "000";

/// Message recorded when a rejection carries none.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Raw envelope returned by every endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    result_cd: Option<Value>,
    result_msg: Option<String>,
    result_dt: Option<String>,
    data: Option<Value>,
}

/// Outcome of a vendor call whose envelope could be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemoteResponse {
    /// `resultCd == "000"`.
    Success {
        /// `resultMsg`.
        message: String,
        /// `resultDt`, the vendor timestamp used as a sync cursor.
        result_dt: Option<String>,
        /// `data`, when the endpoint returns any.
        data: Option<Value>,
    },
    /// Any other result code.
    Rejection {
        /// `resultCd`.
        code: String,
        /// `resultMsg`, or a placeholder when absent.
        message: String,
    },
}

impl RemoteResponse {
    /// Parses the vendor envelope.
    ///
    /// `resultCd` may arrive as a string or a number. A body without it is
    /// malformed.
    pub fn from_envelope(body: Value) -> Result<Self, RemoteError> {
        let envelope: Envelope = serde_json::from_value(body)
            .map_err(|e| RemoteError::Malformed(format!("not a result envelope: {e}")))?;

        let code = match envelope.result_cd {
            Some(Value::String(code)) => code,
            Some(Value::Number(code)) => code
                .as_u64()
                .map_or_else(|| code.to_string(), |n| format!("{n:03}")),
            Some(other) => {
                return Err(RemoteError::Malformed(format!(
                    "unexpected resultCd: {other}"
                )));
            }
            None => return Err(RemoteError::Malformed("missing resultCd".to_string())),
        };

        if code == SUCCESS_CODE {
            Ok(Self::Success {
                message: envelope.result_msg.unwrap_or_default(),
                result_dt: envelope.result_dt,
                data: envelope.data,
            })
        } else {
            Ok(Self::Rejection {
                code,
                message: envelope
                    .result_msg
                    .filter(|msg| !msg.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            })
        }
    }

    /// A bare success, used for operations that span several calls.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            result_dt: None,
            data: None,
        }
    }

    /// Returns true for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `resultDt`, when present on a success.
    #[must_use]
    pub fn result_dt(&self) -> Option<&str> {
        match self {
            Self::Success { result_dt, .. } => result_dt.as_deref(),
            Self::Rejection { .. } => None,
        }
    }

    /// `data`, when present on a success.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Rejection { .. } => None,
        }
    }

    /// Looks up `data.<key>`.
    #[must_use]
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        self.data().and_then(|data| data.get(key))
    }

    /// Elements of the list at `data.<key>`, empty when absent.
    #[must_use]
    pub fn data_list(&self, key: &str) -> &[Value] {
        self.data_field(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
