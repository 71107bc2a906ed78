//! Result handlers: per-operation success write-backs and the shared error
//! path.

pub mod error;
pub mod success;

pub use error::{ErrorEntry, ErrorHandler, ErrorLog, IntegrationError};
pub use success::{SUBMISSION_SEQUENCE_FIELD, SuccessHandlers};
