use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::*;
use crate::audit::AuditStatus;
use crate::remote::{EtimsApi, Operation, RemoteError};
use crate::submission::{Reference, SubmissionError};
use crate::testing::Harness;

/// Calls the vendor once and optionally fails the write-back.
struct TestStep {
    name: String,
    fail_write_back: bool,
    write_backs: AtomicUsize,
}

impl TestStep {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_write_back: false,
            write_backs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Step for TestStep {
    fn operation(&self) -> Operation {
        Operation::SaveItem
    }

    fn reference(&self) -> Reference {
        Reference {
            doctype: Some("Item".to_string()),
            name: Some(self.name.clone()),
        }
    }

    fn snapshot(&self) -> Value {
        json!({"item": self.name})
    }

    async fn call(&self, api: &dyn EtimsApi) -> Result<RemoteResponse, SubmissionError> {
        Ok(api.call(Operation::SaveItem, json!({"itemCd": self.name})).await?)
    }

    async fn succeed(&self, _response: &RemoteResponse) -> Result<(), SubmissionError> {
        self.write_backs.fetch_add(1, Ordering::SeqCst);
        if self.fail_write_back {
            return Err(SubmissionError::DataIntegrity("item vanished".to_string()));
        }
        Ok(())
    }
}

fn rejection() -> RemoteResponse {
    RemoteResponse::Rejection {
        code: "910".to_string(),
        message: "Request parameter error".to_string(),
    }
}

#[tokio::test]
async fn test_success_completes_audit() {
    let h = Harness::new();
    let dispatcher = h.dispatcher(LaneBudgets::default());
    let step = Arc::new(TestStep::new("ITEM-1"));

    let ticket = dispatcher.dispatch(step.clone(), h.client()).ticket().unwrap();
    assert_eq!(ticket.job_name, "etims_save_item_ITEM-1");
    assert_eq!(ticket.wait().await, AttemptOutcome::Completed);

    let records = h.trail.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AuditStatus::Completed);
    assert_eq!(records[0].reference_name.as_deref(), Some("ITEM-1"));
    assert_eq!(step.write_backs.load(Ordering::SeqCst), 1);
    assert!(h.errors.entries().is_empty());
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn test_rejection_fails_audit_and_logs_once() {
    let h = Harness::new();
    h.api.respond(Operation::SaveItem, rejection());
    let dispatcher = h.dispatcher(LaneBudgets::default());
    let step = Arc::new(TestStep::new("ITEM-2"));

    let outcome = dispatcher.dispatch(step.clone(), h.client()).ticket().unwrap().wait().await;

    assert!(matches!(outcome, AttemptOutcome::Failed(ref msg) if msg.contains("910")));
    let records = h.trail.records();
    assert_eq!(records[0].status, AuditStatus::Failed);
    assert_eq!(records[0].error.as_deref(), Some("Request parameter error (Code: 910)"));
    assert_eq!(h.errors.entries().len(), 1);
    assert_eq!(step.write_backs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_error_fails_audit() {
    let h = Harness::new();
    h.api.fail(Operation::SaveItem, RemoteError::Transport("connection reset".to_string()));
    let dispatcher = h.dispatcher(LaneBudgets::default());

    let outcome = dispatcher
        .dispatch(Arc::new(TestStep::new("ITEM-3")), h.client())
        .ticket()
        .unwrap()
        .wait()
        .await;

    assert!(matches!(outcome, AttemptOutcome::Failed(_)));
    assert_eq!(h.trail.records()[0].status, AuditStatus::Failed);
    assert_eq!(h.errors.entries()[0].category, "Transport");
}

#[tokio::test]
async fn test_write_back_failure_fails_audit() {
    let h = Harness::new();
    let dispatcher = h.dispatcher(LaneBudgets::default());
    let mut step = TestStep::new("ITEM-4");
    step.fail_write_back = true;

    let outcome = dispatcher.dispatch(Arc::new(step), h.client()).ticket().unwrap().wait().await;

    assert!(matches!(outcome, AttemptOutcome::Failed(_)));
    assert_eq!(h.trail.records()[0].status, AuditStatus::Failed);
    assert_eq!(h.errors.entries()[0].category, "Data Integrity");
}

#[tokio::test]
async fn test_timeout_finalizes_audit() {
    let h = Harness::new();
    h.api.set_delay(Duration::from_millis(500));
    let budgets = LaneBudgets {
        default: Duration::from_millis(50),
        long: Duration::from_millis(50),
    };
    let dispatcher = h.dispatcher(budgets);

    let outcome = dispatcher
        .dispatch(Arc::new(TestStep::new("ITEM-5")), h.client())
        .ticket()
        .unwrap()
        .wait()
        .await;

    assert_eq!(outcome, AttemptOutcome::TimedOut);
    let records = h.trail.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AuditStatus::Failed);
    assert_eq!(h.trail.finalize_count(records[0].id), 1);
    assert_eq!(h.errors.entries()[0].category, "Timeout");
}

#[tokio::test]
async fn test_single_flight_per_document() {
    let h = Harness::new();
    h.api.set_delay(Duration::from_millis(100));
    let dispatcher = h.dispatcher(LaneBudgets::default());

    let first = dispatcher.dispatch(Arc::new(TestStep::new("ITEM-6")), h.client());
    let second = dispatcher.dispatch(Arc::new(TestStep::new("ITEM-6")), h.client());
    let other = dispatcher.dispatch(Arc::new(TestStep::new("ITEM-7")), h.client());

    assert!(matches!(second, Dispatch::InFlight));
    assert_eq!(first.ticket().unwrap().wait().await, AttemptOutcome::Completed);
    assert_eq!(other.ticket().unwrap().wait().await, AttemptOutcome::Completed);

    let again = dispatcher.dispatch(Arc::new(TestStep::new("ITEM-6")), h.client());
    assert_eq!(again.ticket().unwrap().wait().await, AttemptOutcome::Completed);
    assert_eq!(h.api.calls_to(Operation::SaveItem).len(), 3);
}

#[tokio::test]
async fn test_run_now_returns_response() {
    let h = Harness::new();
    let dispatcher = h.dispatcher(LaneBudgets::default());

    let response = dispatcher
        .run_now(&TestStep::new("ITEM-8"), &h.client())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(h.trail.records()[0].status, AuditStatus::Completed);
}
