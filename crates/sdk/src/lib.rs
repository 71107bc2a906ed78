//! HTTP client for the KRA eTIMS OSCU API.
//!
//! [`HttpClientFactory`] plugs into the core client provider. Each client it
//! builds authenticates with the branch's consumer credentials and posts
//! JSON payloads to the vendor routes, returning the parsed result envelope.

pub mod auth;
pub mod client;
pub mod factory;

pub use auth::TokenSource;
pub use client::HttpEtimsClient;
pub use factory::HttpClientFactory;
