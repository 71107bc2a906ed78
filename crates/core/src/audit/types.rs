//! Audit record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::remote::Operation;

/// Lifecycle of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    /// Created, call not yet finished.
    Pending,
    /// The vendor accepted the request.
    Completed,
    /// Rejected, errored or timed out.
    Failed,
}

impl AuditStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// True for `Completed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            other => Err(format!("Unknown audit status: {other}")),
        }
    }
}

/// Fields of a record about to be opened.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    /// Client-generated id, known before the insert completes.
    pub id: Uuid,
    /// Target operation.
    pub operation: Operation,
    /// `SDK:{env}:{method}`.
    pub url: String,
    /// Doctype of the document the call is about.
    pub reference_doctype: Option<String>,
    /// Name of that document.
    pub reference_name: Option<String>,
    /// Request snapshot. Secrets are masked before this point.
    pub data: Value,
}

impl NewAuditRecord {
    /// A record for `operation` in environment `env_key`.
    #[must_use]
    pub fn new(env_key: &str, operation: Operation, data: Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            operation,
            url: format!("SDK:{env_key}:{}", operation.sdk_method()),
            reference_doctype: None,
            reference_name: None,
            data,
        }
    }

    /// Sets the referenced document.
    #[must_use]
    pub fn referencing(mut self, doctype: Option<&str>, name: Option<&str>) -> Self {
        self.reference_doctype = doctype.map(str::to_string);
        self.reference_name = name.map(str::to_string);
        self
    }
}

/// A persisted audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct AuditRecord {
    pub id: Uuid,
    pub operation: String,
    pub url: String,
    pub reference_doctype: Option<String>,
    pub reference_name: Option<String>,
    pub data: Value,
    pub status: AuditStatus,
    pub output: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
