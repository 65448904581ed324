//! Integration tests for the root banner, health checks and request IDs.

use axum::http::StatusCode;
use serde_json::json;

use rubel_woodworks_api::middleware::REQUEST_ID_HEADER;
use rubel_woodworks_integration_tests::TestApp;

#[tokio::test]
async fn test_root_banner() {
    let app = TestApp::new().await;

    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "Welcome to Rubel Woodworks API" }));
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new().await;

    let live = app.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.bytes, b"ok");

    assert_eq!(app.get("/health/ready", None).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;
    let id = response.headers[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(id.len(), 36);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "upstream-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let forwarded = app.send(request).await;
    assert_eq!(forwarded.headers[REQUEST_ID_HEADER], "upstream-123");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new().await;

    assert_eq!(app.get("/api/nothing-here", None).await.status, StatusCode::NOT_FOUND);
}
