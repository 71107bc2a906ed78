use serde_json::json;

use super::*;
use crate::testing::MemoryMirrorStore;

fn code_list(packing_name: &str) -> RemoteResponse {
    RemoteResponse::from_envelope(json!({
        "resultCd": "000",
        "resultDt": "20241019101500",
        "data": {"clsList": [
            {
                "cdClsNm": "Taxation Type",
                "dtlList": [
                    {"cd": "A", "cdNm": "A-Exempt", "useYn": "Y", "srtOrd": 1, "userDfnCd1": "0"},
                    {"cd": "B", "cdNm": "B-16.00%", "useYn": "Y", "srtOrd": 2, "userDfnCd1": "16"}
                ]
            },
            {
                "cdClsNm": "Packing Unit",
                "dtlList": [
                    {"cd": "NT", "cdNm": packing_name, "useYn": "Y", "srtOrd": 1},
                    {"cd": "BA", "cdNm": "Barrel", "useYn": "Y", "srtOrd": 2},
                    {"cd": "BG", "cdNm": "Bag", "useYn": "Y", "srtOrd": 3}
                ]
            },
            {
                "cdClsNm": "Bank",
                "dtlList": [{"cd": "01", "cdNm": "KCB"}]
            }
        ]}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let mirror = Arc::new(MemoryMirrorStore::default());
    let sync = CodeListSync::new(mirror.clone());

    let first = sync.apply_code_lists(&code_list("Net")).await.unwrap();
    assert_eq!(first.total_changed(), 5);
    assert_eq!(first.changed[&CodeCategory::TaxationType], 2);
    assert_eq!(first.ignored, vec!["Bank".to_string()]);

    let second = sync.apply_code_lists(&code_list("Net")).await.unwrap();
    assert_eq!(second.total_changed(), 0);
    assert_eq!(mirror.code_count(), 5);
}

#[tokio::test]
async fn test_one_field_change_updates_one_row() {
    let mirror = Arc::new(MemoryMirrorStore::default());
    let sync = CodeListSync::new(mirror.clone());

    sync.apply_code_lists(&code_list("Net")).await.unwrap();
    let report = sync.apply_code_lists(&code_list("Net (NT)")).await.unwrap();

    assert_eq!(report.total_changed(), 1);
    assert_eq!(report.changed[&CodeCategory::PackingUnit], 1);
    assert_eq!(mirror.code_count(), 5);

    let packing = mirror.codes(CodeCategory::PackingUnit).await.unwrap();
    let net = packing.iter().find(|c| c.code == "NT").unwrap();
    assert_eq!(net.name, "Net (NT)");
}

#[tokio::test]
async fn test_entry_without_code_aborts_category() {
    let mirror = Arc::new(MemoryMirrorStore::default());
    let sync = CodeListSync::new(mirror.clone());
    let response = RemoteResponse::from_envelope(json!({
        "resultCd": "000",
        "data": {"clsList": [{"cdClsNm": "Country", "dtlList": [{"cdNm": "KENYA"}]}]}
    }))
    .unwrap();

    let err = sync.apply_code_lists(&response).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Format(_)));
    assert_eq!(mirror.code_count(), 0);
}

#[tokio::test]
async fn test_item_classes() {
    let mirror = Arc::new(MemoryMirrorStore::default());
    let sync = CodeListSync::new(mirror.clone());
    let response = RemoteResponse::from_envelope(json!({
        "resultCd": "000",
        "data": {"itemClsList": [
            {"itemClsCd": "5020230500", "itemClsNm": "Soft drinks", "itemClsLvl": 4, "useYn": "Y"},
            {"itemClsCd": "5020230600", "itemClsNm": "Juices", "itemClsLvl": 4, "useYn": "Y"}
        ]}
    }))
    .unwrap();

    assert_eq!(sync.apply_item_classes(&response).await.unwrap(), 2);
    assert_eq!(sync.apply_item_classes(&response).await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_results_and_cursor() {
    let mirror = Arc::new(MemoryMirrorStore::default());
    let sync = CodeListSync::new(mirror.clone());
    let response = RemoteResponse::from_envelope(json!({
        "resultCd": "000",
        "resultDt": "20241019120000",
        "data": {"noticeList": [
            {"noticeNo": 7, "title": "Maintenance"},
            {"noticeNo": 8, "title": "New code list"}
        ]}
    }))
    .unwrap();

    let changed = sync.apply_search(MirrorKind::Notice, "Acme", &response).await.unwrap();
    sync.record_cursor("/NoticeSearchReq", &response).await.unwrap();

    assert_eq!(changed, 2);
    assert_eq!(mirror.records(MirrorKind::Notice).len(), 2);
    assert_eq!(
        mirror.cursor("/NoticeSearchReq").await.unwrap().as_deref(),
        Some("20241019120000")
    );
}
