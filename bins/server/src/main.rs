//! eTIMS bridge server.
//!
//! Main entry point: HTTP API plus the in-process scheduler.

mod scheduler;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use etims_api::{AppState, create_router};
use etims_db::connect_with;
use etims_sdk::HttpClientFactory;
use etims_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etims=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let factory = HttpClientFactory::new()?;
    let state = AppState::new(db, &config.etims, Arc::new(factory))?;
    info!(
        environment = %config.etims.environment,
        vendor = %config.etims.vendor,
        "eTIMS client configured"
    );

    let scheduler = if config.scheduler.enabled {
        Some(scheduler::spawn(state.service.clone(), &config.scheduler))
    } else {
        info!("Scheduler disabled");
        None
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handles) = scheduler {
        for handle in handles {
            handle.abort();
        }
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
