//! Authenticated vendor clients, cached per tenant branch.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use cache::{ClientCache, MokaClientCache};
pub use config::{ClientConfig, ClientHandle, ClientKey};
pub use error::ClientError;
pub use provider::{ClientFactory, ClientProvider};
