//! API route definitions.

use axum::Router;
use etims_shared::AppError;

use crate::{AppState, error::ApiError};

pub mod audit;
pub mod bulk;
pub mod documents;
pub mod health;
pub mod jobs;
pub mod registry;
pub mod settings;
pub mod warehouses;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(settings::routes())
        .merge(documents::routes())
        .merge(bulk::routes())
        .merge(registry::routes())
        .merge(jobs::routes())
        .merge(audit::routes())
        .merge(warehouses::routes())
}

/// Parses a path segment, turning the parser's message into a 400.
pub(crate) fn parse_segment<T>(raw: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse().map_err(|e: String| ApiError(AppError::Validation(e)))
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
