//! Common types used across the application.

pub mod amount;
pub mod pagination;

pub use amount::{Amount, quantize};
pub use pagination::{PageMeta, PageRequest, PageResponse};
