//! Background reconciliation: re-drive every eligible document that the
//! vendor has not accepted yet.

use std::future::Future;

use serde::Serialize;

use crate::submission::{AttemptOutcome, Dispatch, JobTicket, SubmissionError};

/// A document whose trigger raised during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    /// Document name.
    pub name: String,
    /// Error text.
    pub error: String,
}

/// Result of one sweep run.
#[derive(Debug, Default, Serialize)]
pub struct SweepReport {
    /// Entry point name.
    pub job: String,
    /// Documents the sweep looked at.
    pub attempted: usize,
    /// Attempts enqueued.
    pub enqueued: usize,
    /// Documents a precondition skipped.
    pub skipped: usize,
    /// Documents already accepted or with an attempt running.
    pub unchanged: usize,
    /// Documents whose trigger raised.
    pub failed: Vec<SweepFailure>,
    #[serde(skip)]
    tickets: Vec<(String, JobTicket)>,
}

impl SweepReport {
    /// Waits for every enqueued attempt.
    pub async fn wait_all(self) -> Vec<(String, AttemptOutcome)> {
        let mut outcomes = Vec::with_capacity(self.tickets.len());
        for (name, ticket) in self.tickets {
            outcomes.push((name, ticket.wait().await));
        }
        outcomes
    }
}

/// Triggers `submit` for every name, isolating failures.
///
/// A document whose trigger raises is recorded and the sweep moves on.
pub async fn run_sweep<F, Fut>(job: &str, names: Vec<String>, mut submit: F) -> SweepReport
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Dispatch, SubmissionError>>,
{
    let mut report = SweepReport {
        job: job.to_string(),
        ..SweepReport::default()
    };

    for name in names {
        report.attempted += 1;
        match submit(name.clone()).await {
            Ok(Dispatch::Enqueued(ticket)) => {
                report.enqueued += 1;
                report.tickets.push((name, ticket));
            }
            Ok(Dispatch::Skipped(reason)) => {
                tracing::debug!(job, document = %name, reason, "Skipped by precondition");
                report.skipped += 1;
            }
            Ok(Dispatch::AlreadySubmitted | Dispatch::InFlight) => report.unchanged += 1,
            Err(e) => {
                tracing::warn!(job, document = %name, error = %e, "Sweep trigger failed; continuing");
                report.failed.push(SweepFailure {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        job,
        attempted = report.attempted,
        enqueued = report.enqueued,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Sweep finished"
    );
    report
}
