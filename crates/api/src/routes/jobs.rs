//! Manual triggers for scheduler entry points.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use etims_core::integration::{Cadence, Job};
use etims_core::sweep::SweepReport;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiResult};

/// Creates the job routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/{job}", post(run_job))
}

/// A scheduler entry point.
#[derive(Debug, Serialize)]
pub struct JobView {
    /// Name accepted by the trigger route.
    pub name: &'static str,
    /// Scheduler cadence.
    pub cadence: Cadence,
}

async fn list_jobs() -> Json<Vec<JobView>> {
    Json(
        Job::ALL
            .into_iter()
            .map(|job| JobView {
                name: job.name(),
                cadence: job.cadence(),
            })
            .collect(),
    )
}

/// POST `/jobs/{job}` - Run an entry point now.
async fn run_job(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<axum::response::Response> {
    let Ok(job) = name.parse::<Job>() else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "NOT_FOUND",
                "message": format!("Unknown job: {name}")
            })),
        )
            .into_response());
    };

    let report: SweepReport = state.service.run_job(job).await?;
    info!(job = job.name(), enqueued = report.enqueued, failed = report.failed.len(), "Manual job run");
    Ok((StatusCode::ACCEPTED, Json(report)).into_response())
}
