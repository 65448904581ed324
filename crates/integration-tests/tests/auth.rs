//! Integration tests for login, registration and identity resolution.

use axum::http::{Method, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::json;

use rubel_woodworks_api::db::UserStore;
use rubel_woodworks_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp};

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new().await;

    let response = app
        .form(
            "/api/auth/login",
            &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");
    assert_eq!(response.body["username"], ADMIN_USERNAME);
    assert_eq!(response.body["isAdmin"], true);
    assert!(response.body["access_token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;

    for (username, password) in [(ADMIN_USERNAME, "wrong-password"), ("nobody", "whatever-pass")] {
        let response = app
            .form(
                "/api/auth/login",
                &[("username", username), ("password", password)],
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.detail(), "Incorrect username or password");
        assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
    }
}

#[tokio::test]
async fn test_register_and_me() {
    let app = TestApp::new().await;

    let token = app.register("  rahim  ", "furniture-fan").await;
    let me = app.get("/api/auth/me", Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body, json!({ "username": "rahim", "isAdmin": false }));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    app.register("rahim", "furniture-fan").await;

    let cases = [
        (json!({ "username": "rahim", "password": "another-pass" }), "Username already exists"),
        (json!({ "username": "karim", "password": "short" }), ""),
        (json!({ "username": "   ", "password": "long-enough" }), ""),
        (json!({ "username": "karim" }), ""),
    ];
    for (body, detail) in cases {
        let response = app
            .json(Method::POST, "/api/auth/register", None, &body)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        if !detail.is_empty() {
            assert_eq!(response.detail(), detail);
        }
    }
}

#[tokio::test]
async fn test_concurrent_registration_creates_one_user() {
    let app = TestApp::new().await;
    let body = json!({ "username": "twin", "password": "same-password" });

    let (first, second) = tokio::join!(
        app.json(Method::POST, "/api/auth/register", None, &body),
        app.json(Method::POST, "/api/auth/register", None, &body),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let admin = app.admin_token().await;
    let users = app.get("/api/users", Some(&admin)).await;
    let twins = users
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["username"] == "twin")
        .count();
    assert_eq!(twins, 1);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let missing = app.get("/api/auth/me", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.detail(), "Not authenticated");

    let garbage = app.get("/api/auth/me", Some("not-a-token")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.detail(), "Could not validate credentials");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new().await;
    let admin = app
        .state
        .stores()
        .users
        .get_by_username(ADMIN_USERNAME)
        .await
        .unwrap()
        .unwrap();

    let stale = app
        .state
        .tokens()
        .issue_at(&admin, Utc::now() - Duration::hours(2))
        .unwrap();
    let response = app.get("/api/auth/me", Some(&stale.access_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), "Token has expired");
}

#[tokio::test]
async fn test_deleted_user_token_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let token = app.register("leaving", "goodbye-pass").await;
    assert_eq!(app.get("/api/auth/me", Some(&token)).await.status, StatusCode::OK);

    let users = app.get("/api/users", Some(&admin)).await;
    let id = users
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "leaving")
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let deleted = app.delete(&format!("/api/users/{id}"), Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let response = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let my_orders = app.get("/api/my-orders", Some(&token)).await;
    assert_eq!(my_orders.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recreated_username_rejects_old_token() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let stale = app.register("rahim", "first-pass-123").await;

    let user = app
        .state
        .stores()
        .users
        .get_by_username("rahim")
        .await
        .unwrap()
        .unwrap();
    let deleted = app
        .delete(&format!("/api/users/{}", user.id), Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let fresh = app.register("rahim", "second-pass-456").await;

    let response = app.get("/api/auth/me", Some(&stale)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let my_orders = app.get("/api/my-orders", Some(&stale)).await;
    assert_eq!(my_orders.status, StatusCode::UNAUTHORIZED);

    let me = app.get("/api/auth/me", Some(&fresh)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "rahim");
}

#[tokio::test]
async fn test_malformed_login_form() {
    let app = TestApp::new().await;

    let response = app.form("/api/auth/login", &[("username", "admin")]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.detail().is_empty());
}
