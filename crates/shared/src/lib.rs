//! Shared types, errors, and configuration for the eTIMS bridge.
//!
//! This crate provides common types used across all other crates:
//! - `Amount`, the truncating two-decimal figure the vendor expects
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, EtimsConfig, SchedulerConfig};
pub use error::{AppError, AppResult};
pub use types::{Amount, quantize};
