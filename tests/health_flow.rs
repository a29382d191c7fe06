mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("ok"));
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (app, pool) = test_app_with_pool().await;
    pool.close().await;

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], json!("unavailable"));
    assert_eq!(body["database"], json!("unreachable"));
}

#[tokio::test]
async fn test_root_is_not_routed() {
    let app = test_app().await;

    let (status, _) = get(&app, "/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_lists_resources() {
    let app = test_app().await;

    let (status, doc) = get(&app, "/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().expect("document has paths");
    for path in ["/health", "/leagues/", "/leagues/{id}", "/teams/", "/teams/{id}", "/players/", "/players/{id}"] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
    assert!(doc["paths"]["/teams/"]["get"]["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .any(|param| param["name"] == "championships_won"));
    assert!(doc["components"]["schemas"]["League"].is_object());
    assert!(doc["components"]["schemas"]["NewPlayer"].is_object());
}
