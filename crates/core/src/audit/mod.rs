//! Integration-request audit trail.
//!
//! Every vendor call is preceded by a `Pending` record. The record is moved
//! to `Completed` or `Failed` exactly once, whichever path finishes the
//! attempt first: the task itself or the timeout watcher.

pub mod recorder;
pub mod types;

pub use recorder::{AuditRecorder, AuditSlot, AuditTrail};
pub use types::{AuditRecord, AuditStatus, NewAuditRecord};
