//! Vendor API seam: operations, the response envelope and the client trait.
//!
//! The HTTP implementation lives in `etims-sdk`. Everything here is
//! transport-agnostic so the pipeline can be exercised with in-memory
//! clients.

pub mod api;
pub mod error;
pub mod operation;
pub mod response;

pub use api::EtimsApi;
pub use error::RemoteError;
pub use operation::{Lane, LaneBudgets, Operation};
pub use response::{RemoteResponse, SUCCESS_CODE};
