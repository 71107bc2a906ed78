//! In-process scheduler driving the periodic entry points.

use std::time::Duration;

use etims_core::integration::{Cadence, EtimsService, Job};
use etims_shared::SchedulerConfig;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

/// Starts one loop per cadence.
pub fn spawn(service: EtimsService, config: &SchedulerConfig) -> Vec<JoinHandle<()>> {
    [
        (Cadence::All, config.all_interval_secs),
        (Cadence::Hourly, config.hourly_interval_secs),
        (Cadence::Monthly, config.monthly_interval_secs),
    ]
    .into_iter()
    .map(|(cadence, secs)| {
        let service = service.clone();
        tokio::spawn(run_cadence(service, cadence, Duration::from_secs(secs.max(1))))
    })
    .collect()
}

async fn run_cadence(service: EtimsService, cadence: Cadence, period: Duration) {
    info!(?cadence, period_secs = period.as_secs(), "Scheduler loop started");
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        for job in Job::of(cadence) {
            match service.run_job(job).await {
                Ok(report) => info!(
                    job = job.name(),
                    attempted = report.attempted,
                    enqueued = report.enqueued,
                    skipped = report.skipped,
                    failed = report.failed.len(),
                    "Scheduled job ran"
                ),
                Err(e) => warn!(job = job.name(), error = %e, "Scheduled job failed"),
            }
        }
    }
}
