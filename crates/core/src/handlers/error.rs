//! The shared failure path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::remote::Operation;
use crate::store::StoreError;
use crate::submission::SubmissionError;

/// A persisted error log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ErrorEntry {
    pub id: Uuid,
    pub title: String,
    /// Taxonomy name, e.g. `Remote Rejection`.
    pub category: String,
    pub message: String,
    /// Vendor route of the failed operation.
    pub route: String,
    pub reference_doctype: Option<String>,
    pub reference_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Error log storage.
#[async_trait]
pub trait ErrorLog: Send + Sync {
    /// Appends an entry.
    async fn record(&self, entry: ErrorEntry) -> Result<(), StoreError>;
}

/// The uniform error every failed attempt ends in.
#[derive(Debug, Clone, Error)]
#[error("eTIMS {route} failed ({category}): {message}")]
pub struct IntegrationError {
    /// Vendor route.
    pub route: &'static str,
    /// Taxonomy name.
    pub category: &'static str,
    /// Human readable reason.
    pub message: String,
}

/// Logs a failure once and turns it into an [`IntegrationError`].
#[derive(Clone)]
pub struct ErrorHandler {
    log: Arc<dyn ErrorLog>,
}

impl ErrorHandler {
    /// Creates a handler writing to `log`.
    #[must_use]
    pub fn new(log: Arc<dyn ErrorLog>) -> Self {
        Self { log }
    }

    /// Records `error` against the referenced document.
    ///
    /// Emits one error event and one log row. A failure to write the row is
    /// reported as a warning and otherwise ignored.
    pub async fn on_error(
        &self,
        error: &SubmissionError,
        operation: Operation,
        doctype: Option<&str>,
        document_name: Option<&str>,
    ) -> IntegrationError {
        let route = operation.route();
        let category = error.category();
        let message = error.to_string();

        tracing::error!(
            operation = %operation,
            route,
            category,
            doctype,
            document = document_name,
            error = %message,
            "eTIMS request failed"
        );

        let entry = ErrorEntry {
            id: Uuid::now_v7(),
            title: format!("eTIMS {route} error"),
            category: category.to_string(),
            message: message.clone(),
            route: route.to_string(),
            reference_doctype: doctype.map(str::to_string),
            reference_name: document_name.map(str::to_string),
            created_at: Utc::now(),
        };
        if let Err(e) = self.log.record(entry).await {
            tracing::warn!(route, error = %e, "Could not persist error log entry");
        }

        IntegrationError {
            route,
            category,
            message,
        }
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryErrorLog;

    #[tokio::test]
    async fn test_one_entry_per_error() {
        let log = Arc::new(MemoryErrorLog::default());
        let handler = ErrorHandler::new(log.clone());

        let error = SubmissionError::Rejection {
            code: "910".to_string(),
            message: "Request parameter error".to_string(),
        };
        let raised = handler
            .on_error(&error, Operation::SaveSales, Some("Sales Invoice"), Some("SINV-00-00001"))
            .await;

        assert_eq!(raised.route, "/TrnsSalesSaveWrReq");
        assert_eq!(raised.category, "Remote Rejection");
        assert!(raised.message.contains("910"));

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reference_name.as_deref(), Some("SINV-00-00001"));
        assert_eq!(entries[0].title, "eTIMS /TrnsSalesSaveWrReq error");
    }
}
