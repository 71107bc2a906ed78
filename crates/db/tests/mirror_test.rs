//! Integration tests for the mirror and reference repositories.

mod common;

use etims_core::codelist::{CodeCategory, ItemClassification, MirrorKind, MirrorRecord, MirrorStore, ReferenceCode};
use etims_core::submission::ReferenceData;
use etims_db::{MirrorRepository, ReferenceRepository};
use serde_json::json;

fn code(code: &str, name: &str) -> ReferenceCode {
    ReferenceCode {
        category: CodeCategory::PackingUnit,
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        sort_order: Some(1),
        in_use: true,
        user_defined_1: None,
        user_defined_2: None,
        user_defined_3: None,
    }
}

#[tokio::test]
async fn test_replaying_codes_changes_nothing() {
    let repo = MirrorRepository::new(common::connect().await);
    let first = code(&common::unique("PU"), "Bag");
    let second = code(&common::unique("PU"), "Box");
    let batch = vec![first.clone(), second.clone()];

    assert_eq!(repo.upsert_codes(CodeCategory::PackingUnit, &batch).await.expect("first sync"), 2);
    assert_eq!(repo.upsert_codes(CodeCategory::PackingUnit, &batch).await.expect("replay"), 0);

    let renamed = vec![first.clone(), code(&second.code, "Carton")];
    assert_eq!(repo.upsert_codes(CodeCategory::PackingUnit, &renamed).await.expect("change"), 1);

    let stored = repo.codes(CodeCategory::PackingUnit).await.expect("codes");
    let carton = stored.iter().find(|c| c.code == second.code).expect("renamed code");
    assert_eq!(carton.name, "Carton");
    assert_eq!(carton.category, CodeCategory::PackingUnit);
}

#[tokio::test]
async fn test_item_classes_upsert() {
    let repo = MirrorRepository::new(common::connect().await);
    let class = ItemClassification {
        code: common::unique("cls"),
        name: "Beverages".to_string(),
        level: Some(4),
        tax_type: Some("B".to_string()),
        major_target: false,
        in_use: true,
    };

    assert_eq!(repo.upsert_item_classes(&[class.clone()]).await.expect("insert"), 1);
    assert_eq!(repo.upsert_item_classes(&[class]).await.expect("replay"), 0);
}

#[tokio::test]
async fn test_records_are_scoped_by_company() {
    let repo = MirrorRepository::new(common::connect().await);
    let key = common::unique("notice");
    let record = MirrorRecord {
        key: key.clone(),
        data: json!({"noticeNo": key, "title": "System maintenance"}),
    };

    assert_eq!(repo.upsert_records(MirrorKind::Notice, "Acme", &[record.clone()]).await.expect("acme"), 1);
    assert_eq!(repo.upsert_records(MirrorKind::Notice, "Beta", &[record.clone()]).await.expect("beta"), 1);
    assert_eq!(repo.upsert_records(MirrorKind::Notice, "Acme", &[record]).await.expect("replay"), 0);
}

#[tokio::test]
async fn test_route_cursor() {
    let repo = MirrorRepository::new(common::connect().await);
    let route = common::unique("/NoticeSearchReq");

    assert_eq!(repo.cursor(&route).await.expect("cursor"), None);
    repo.record_cursor(&route, "20240101000000").await.expect("record");
    repo.record_cursor(&route, "20240301120000").await.expect("advance");
    assert_eq!(repo.cursor(&route).await.expect("cursor").as_deref(), Some("20240301120000"));
}

#[tokio::test]
async fn test_warehouse_branches() {
    let repo = ReferenceRepository::new(common::connect().await);
    let stores = common::unique("Stores");
    let unmapped = common::unique("Transit");

    repo.upsert_warehouse(&stores, "Acme", "00").await.expect("map");
    repo.upsert_warehouse(&stores, "Acme", "01").await.expect("remap");

    let branches = repo
        .warehouse_branches(&[stores.clone(), unmapped.clone()])
        .await
        .expect("branches");
    assert_eq!(branches.get(&stores).map(String::as_str), Some("01"));
    assert!(!branches.contains_key(&unmapped));
}
