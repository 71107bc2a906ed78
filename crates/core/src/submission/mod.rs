//! The submission orchestrator.
//!
//! A trigger checks the document's flag and preconditions synchronously,
//! then enqueues an attempt. The attempt opens an audit record, builds the
//! payload, calls the vendor and routes the outcome to the success or error
//! handler. There is no retry inside an attempt; the sweep re-drives
//! documents that are still unsubmitted.

pub mod attempt;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod precondition;

pub use attempt::{AttemptRunner, Reference, Step};
pub use dispatcher::{AttemptOutcome, Dispatch, Dispatcher, JobTicket};
pub use document::{
    DOCSTATUS_CANCELLED, DOCSTATUS_SUBMITTED, DocumentKind, DocumentStore, ReferenceData,
    StoredDocument, SubmissionFlag,
};
pub use error::SubmissionError;
pub use precondition::Gate;
