//! Integration tests for the audit and error log repositories.

mod common;

use chrono::Utc;
use etims_core::audit::{AuditStatus, AuditTrail, NewAuditRecord};
use etims_core::handlers::{ErrorEntry, ErrorLog};
use etims_core::remote::Operation;
use etims_core::store::StoreError;
use etims_db::{AuditFilter, AuditRepository, ErrorLogRepository};
use etims_shared::types::PageRequest;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_open_then_finalize_once() {
    let repo = AuditRepository::new(common::connect().await);
    let name = common::unique("ACC-SINV");
    let record = NewAuditRecord::new("sbx", Operation::SaveSales, json!({"invcNo": 1}))
        .referencing(Some("Sales Invoice"), Some(&name));
    let id = record.id;

    repo.open(record).await.expect("Failed to open");
    let stored = repo.get(id).await.expect("query").expect("record exists");
    assert_eq!(stored.status, AuditStatus::Pending);
    assert_eq!(stored.operation, Operation::SaveSales.route());
    assert_eq!(stored.data["invcNo"], 1);

    repo.finalize(id, AuditStatus::Completed, Some("{\"resultCd\":\"000\"}".to_string()), None)
        .await
        .expect("Failed to finalize");
    let second = repo.finalize(id, AuditStatus::Failed, None, Some("late".to_string())).await;
    assert!(matches!(second, Err(StoreError::NotFound(_))));

    let stored = repo.get(id).await.expect("query").expect("record exists");
    assert_eq!(stored.status, AuditStatus::Completed);
    assert!(stored.error.is_none());
}

#[tokio::test]
async fn test_list_filters_by_document() {
    let repo = AuditRepository::new(common::connect().await);
    let name = common::unique("MAT-SLE");

    for _ in 0..3 {
        let record = NewAuditRecord::new("sbx", Operation::SaveStockMovement, json!({}))
            .referencing(Some("Stock Ledger Entry"), Some(&name));
        repo.open(record).await.expect("open");
    }

    let filter = AuditFilter {
        reference_name: Some(name.clone()),
        ..AuditFilter::default()
    };
    let page = repo
        .list(&PageRequest { page: 1, per_page: 2 }, &filter)
        .await
        .expect("list");
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert!(page.data.iter().all(|r| r.reference_name.as_deref() == Some(name.as_str())));
}

#[tokio::test]
async fn test_error_log_record_and_list() {
    let repo = ErrorLogRepository::new(common::connect().await);
    let name = common::unique("ACC-PINV");

    repo.record(ErrorEntry {
        id: Uuid::now_v7(),
        title: "eTIMS purchase submission failed".to_string(),
        category: "Remote Rejection".to_string(),
        message: "Invalid item code".to_string(),
        route: Operation::SavePurchase.route().to_string(),
        reference_doctype: Some("Purchase Invoice".to_string()),
        reference_name: Some(name.clone()),
        created_at: Utc::now(),
    })
    .await
    .expect("record");

    let page = repo.list(&PageRequest::default(), Some(&name)).await.expect("list");
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].category, "Remote Rejection");
}
