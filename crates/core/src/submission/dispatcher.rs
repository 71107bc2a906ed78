//! Lane-budgeted background tasks with per-document single-flight.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::attempt::{AttemptRunner, Step};
use crate::audit::AuditSlot;
use crate::client::ClientHandle;
use crate::handlers::IntegrationError;
use crate::remote::{LaneBudgets, RemoteResponse};

/// How an attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The vendor accepted the request and write-backs succeeded.
    Completed,
    /// The attempt failed; the message is the logged reason.
    Failed(String),
    /// The attempt exceeded its lane budget.
    TimedOut,
}

impl AttemptOutcome {
    /// True for [`AttemptOutcome::Completed`].
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Handle of an enqueued attempt.
#[derive(Debug)]
pub struct JobTicket {
    /// Job name, `etims_{method}_{document}`.
    pub job_name: String,
    handle: JoinHandle<AttemptOutcome>,
}

impl JobTicket {
    /// Waits for the attempt to finish.
    pub async fn wait(self) -> AttemptOutcome {
        self.handle
            .await
            .unwrap_or_else(|e| AttemptOutcome::Failed(format!("task aborted: {e}")))
    }
}

/// What a trigger did.
#[derive(Debug)]
pub enum Dispatch {
    /// An attempt was enqueued.
    Enqueued(JobTicket),
    /// An attempt for the same document is already running.
    InFlight,
    /// The document was already accepted.
    AlreadySubmitted,
    /// A precondition says the document is not reported.
    Skipped(String),
}

impl Dispatch {
    /// The ticket, when an attempt was enqueued.
    #[must_use]
    pub fn ticket(self) -> Option<JobTicket> {
        match self {
            Self::Enqueued(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Short status name for API responses.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Enqueued(_) => "enqueued",
            Self::InFlight => "in_flight",
            Self::AlreadySubmitted => "already_submitted",
            Self::Skipped(_) => "skipped",
        }
    }
}

/// Removes its key from the in-flight set when dropped.
#[derive(Debug)]
struct FlightGuard {
    key: String,
    in_flight: Arc<DashMap<String, ()>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

/// Spawns attempts on the runtime within their lane budget.
#[derive(Clone)]
pub struct Dispatcher {
    runner: AttemptRunner,
    budgets: LaneBudgets,
    in_flight: Arc<DashMap<String, ()>>,
}

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(runner: AttemptRunner, budgets: LaneBudgets) -> Self {
        Self {
            runner,
            budgets,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Enqueues `step` and returns immediately.
    ///
    /// Returns [`Dispatch::InFlight`] when the step's flight key is held by
    /// a running attempt.
    pub fn dispatch(&self, step: Arc<dyn Step>, client: ClientHandle) -> Dispatch {
        let guard = match step.flight_key() {
            Some(key) => match self.claim(key) {
                Some(guard) => Some(guard),
                None => return Dispatch::InFlight,
            },
            None => None,
        };

        let operation = step.operation();
        let budget = self.budgets.budget_for(operation);
        let job_name = job_name(step.as_ref());
        let span = tracing::info_span!("etims_job", job = %job_name, lane = operation.lane().as_str());
        let runner = self.runner.clone();

        let handle = tokio::spawn(
            async move {
                let _guard = guard;
                let slot = AuditSlot::new();
                match tokio::time::timeout(budget, runner.run(step.as_ref(), &client, &slot)).await {
                    Ok(Ok(_)) => AttemptOutcome::Completed,
                    Ok(Err(e)) => AttemptOutcome::Failed(e.message),
                    Err(_) => {
                        runner.time_out(step.as_ref(), &slot, budget).await;
                        AttemptOutcome::TimedOut
                    }
                }
            }
            .instrument(span),
        );

        tracing::debug!(job = %job_name, "Enqueued eTIMS job");
        Dispatch::Enqueued(JobTicket { job_name, handle })
    }

    /// Runs `step` in the caller's task within the same budget.
    pub async fn run_now(
        &self,
        step: &dyn Step,
        client: &ClientHandle,
    ) -> Result<RemoteResponse, IntegrationError> {
        let budget = self.budgets.budget_for(step.operation());
        let slot = AuditSlot::new();
        match tokio::time::timeout(budget, self.runner.run(step, client, &slot)).await {
            Ok(result) => result,
            Err(_) => Err(self.runner.time_out(step, &slot, budget).await),
        }
    }

    /// Number of attempts currently holding a flight key.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn claim(&self, key: String) -> Option<FlightGuard> {
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(FlightGuard {
                    key,
                    in_flight: Arc::clone(&self.in_flight),
                })
            }
        }
    }
}

fn job_name(step: &dyn Step) -> String {
    let reference = step.reference();
    match reference.name {
        Some(name) => format!("etims_{}_{name}", step.operation().sdk_method()),
        None => format!("etims_{}", step.operation().sdk_method()),
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("budgets", &self.budgets)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
