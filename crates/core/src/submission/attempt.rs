//! One submission attempt: audit, call, interpret, write back.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::document::DocumentKind;
use super::error::SubmissionError;
use crate::audit::{AuditRecorder, AuditSlot, NewAuditRecord};
use crate::client::ClientHandle;
use crate::handlers::{ErrorHandler, IntegrationError, SuccessHandlers};
use crate::remote::{EtimsApi, Operation, RemoteResponse};

/// The record an attempt is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Doctype, when the attempt concerns a record.
    pub doctype: Option<String>,
    /// Record name.
    pub name: Option<String>,
}

impl Reference {
    /// A mirrored document.
    #[must_use]
    pub fn document(kind: DocumentKind, name: impl Into<String>) -> Self {
        Self {
            doctype: Some(kind.doctype().to_string()),
            name: Some(name.into()),
        }
    }

    /// No record; used by searches and refreshes.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            doctype: None,
            name: None,
        }
    }
}

/// The operation-specific part of an attempt.
///
/// Building happens inside [`Step::call`] so that build failures are audited
/// like any other failure.
#[async_trait]
pub trait Step: Send + Sync {
    /// Target operation.
    fn operation(&self) -> Operation;

    /// Record the attempt is about.
    fn reference(&self) -> Reference;

    /// Request snapshot stored on the audit record. Secrets must be masked.
    fn snapshot(&self) -> Value;

    /// Key of the in-process single-flight guard, `None` to allow overlap.
    fn flight_key(&self) -> Option<String> {
        let reference = self.reference();
        Some(format!(
            "{}:{}:{}",
            self.operation(),
            reference.doctype.as_deref().unwrap_or("-"),
            reference.name.as_deref().unwrap_or("-")
        ))
    }

    /// Builds the request and calls the vendor.
    async fn call(&self, api: &dyn EtimsApi) -> Result<RemoteResponse, SubmissionError>;

    /// Persists the success side effects.
    async fn succeed(&self, response: &RemoteResponse) -> Result<(), SubmissionError>;
}

/// Runs steps with auditing and the shared error path.
#[derive(Clone)]
pub struct AttemptRunner {
    audit: AuditRecorder,
    errors: ErrorHandler,
    handlers: SuccessHandlers,
}

impl AttemptRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(audit: AuditRecorder, errors: ErrorHandler, handlers: SuccessHandlers) -> Self {
        Self {
            audit,
            errors,
            handlers,
        }
    }

    /// Runs one attempt to a terminal audit state.
    ///
    /// The audit record is opened before the call. Every failure, whether a
    /// rejection, a transport error or a build error, goes through the error
    /// handler and leaves the record `Failed`.
    pub async fn run(
        &self,
        step: &dyn Step,
        client: &ClientHandle,
        slot: &AuditSlot,
    ) -> Result<RemoteResponse, IntegrationError> {
        let operation = step.operation();
        let reference = step.reference();
        let record = NewAuditRecord::new(client.env_key(), operation, step.snapshot())
            .referencing(reference.doctype.as_deref(), reference.name.as_deref());

        let outcome = match self.audit.open(slot, record).await {
            Ok(_) => self.exchange(step, client).await,
            Err(e) => Err(SubmissionError::Store(e)),
        };

        match outcome {
            Ok(response) => {
                self.audit
                    .complete(slot, serde_json::to_string(&response).ok())
                    .await;
                Ok(response)
            }
            Err(error) => {
                let raised = self
                    .errors
                    .on_error(
                        &error,
                        operation,
                        reference.doctype.as_deref(),
                        reference.name.as_deref(),
                    )
                    .await;
                self.audit.fail(slot, error.to_string()).await;
                Err(raised)
            }
        }
    }

    async fn exchange(
        &self,
        step: &dyn Step,
        client: &ClientHandle,
    ) -> Result<RemoteResponse, SubmissionError> {
        match step.call(client.api.as_ref()).await? {
            response @ RemoteResponse::Success { .. } => {
                step.succeed(&response).await?;
                // A cursor write never fails an accepted attempt.
                let route = step.operation().route();
                if let Err(e) = self.handlers.cursor(route, &response).await {
                    tracing::warn!(route, error = %e, "Could not record sync cursor");
                }
                Ok(response)
            }
            RemoteResponse::Rejection { code, message } => {
                Err(SubmissionError::Rejection { code, message })
            }
        }
    }

    /// Finalizes an attempt that exceeded its budget.
    pub async fn time_out(&self, step: &dyn Step, slot: &AuditSlot, budget: Duration) -> IntegrationError {
        let error = SubmissionError::Timeout(budget.as_secs());
        let reference = step.reference();
        let raised = self
            .errors
            .on_error(
                &error,
                step.operation(),
                reference.doctype.as_deref(),
                reference.name.as_deref(),
            )
            .await;
        self.audit.fail(slot, error.to_string()).await;
        raised
    }
}

impl std::fmt::Debug for AttemptRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptRunner").finish_non_exhaustive()
    }
}
