//! Core submission pipeline for the eTIMS bridge.
//!
//! This crate contains pure pipeline logic with ZERO web or database dependencies.
//! Storage and the vendor client are reached through port traits implemented by
//! `etims-db` and `etims-sdk`.
//!
//! # Modules
//!
//! - `payload` - ERP snapshot to vendor request translation
//! - `client` - Cached, authenticated vendor clients per tenant and branch
//! - `submission` - Preconditions, single-flight dispatch and attempts
//! - `handlers` - Success write-backs and error categorization
//! - `codelist` - Reference data and search result mirroring
//! - `integration` - Triggers, registry operations and scheduler jobs

pub mod audit;
pub mod client;
pub mod codelist;
pub mod handlers;
pub mod integration;
pub mod payload;
pub mod remote;
pub mod settings;
pub mod store;
pub mod submission;
pub mod sweep;

#[cfg(test)]
pub(crate) mod testing;
