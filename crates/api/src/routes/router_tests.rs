use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use etims_core::client::{ClientConfig, ClientError, ClientFactory};
use etims_core::remote::EtimsApi;
use etims_shared::EtimsConfig;
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

struct OfflineFactory;

impl ClientFactory for OfflineFactory {
    fn connect(&self, _config: ClientConfig) -> Result<Arc<dyn EtimsApi>, ClientError> {
        Err(ClientError::Construction("offline".to_string()))
    }
}

fn router() -> Router {
    let state = AppState::new(
        DatabaseConnection::default(),
        &EtimsConfig::default(),
        Arc::new(OfflineFactory),
    )
    .expect("default config wires");
    create_router(state)
}

async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router()
        .oneshot(request.body(body).expect("request builds"))
        .await
        .expect("router answers");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_reports_degraded_database() {
    let (status, body) = send("GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], false);
    assert_eq!(body["in_flight"], 0);
}

#[tokio::test]
async fn test_unknown_document_kind_is_rejected() {
    let (status, body) = send("POST", "/api/v1/documents/journal-entry", Some(json!({"name": "JV-1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[rstest]
#[case::sales("sales-invoice")]
#[case::doctype("Purchase Invoice")]
#[case::item("item")]
#[tokio::test]
async fn test_event_without_name_is_rejected(#[case] kind: &str) {
    let uri = format!("/api/v1/documents/{}", kind.replace(' ', "%20"));
    let (status, body) = send("POST", &uri, Some(json!({"company": "Acme Ltd"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().contains("without a name"));
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let (status, body) = send("POST", "/api/v1/jobs/rebuild-everything", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Unknown job: rebuild-everything");
}

#[tokio::test]
async fn test_jobs_are_listed_with_cadence() {
    let (status, body) = send("GET", "/api/v1/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().expect("array");
    assert_eq!(jobs.len(), 8);
    assert!(jobs.contains(&json!({"name": "send-pending-stock", "cadence": "all"})));
    assert!(jobs.contains(&json!({"name": "sync-code-lists", "cadence": "monthly"})));
}

#[tokio::test]
async fn test_bulk_requires_a_selection() {
    let (status, _) = send("POST", "/api/v1/bulk/items", Some(json!({"names": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_warehouse_branch_must_be_two_characters() {
    let (status, body) = send(
        "PUT",
        "/api/v1/warehouses/Stores%20-%20AL",
        Some(json!({"company": "Acme Ltd", "branch": "001"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[test]
fn test_unknown_environment_fails_wiring() {
    let config = EtimsConfig {
        environment: "Staging".to_string(),
        ..EtimsConfig::default()
    };
    let result = AppState::new(DatabaseConnection::default(), &config, Arc::new(OfflineFactory));
    assert!(result.is_err());
}
