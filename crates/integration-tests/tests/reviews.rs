//! Integration tests for reviews, rating summaries and moderation.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use rubel_woodworks_integration_tests::TestApp;

async fn post_review(app: &TestApp, token: &str, product_id: &Value, rating: i64) -> Value {
    let response = app
        .json(
            Method::POST,
            "/api/reviews",
            Some(token),
            &json!({ "product_id": product_id, "rating": rating, "comment": "Sturdy" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body
}

#[tokio::test]
async fn test_rating_summary() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let rating_path = format!("/api/products/{}/rating", product["id"]);

    let empty = app.get(&rating_path, None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body, json!({ "average_rating": 0.0, "review_count": 0 }));

    let alice = app.register("alice", "alice-password").await;
    let bob = app.register("bob", "bob-password").await;
    let carol = app.register("carol", "carol-password").await;
    post_review(&app, &alice, &product["id"], 4).await;
    post_review(&app, &bob, &product["id"], 5).await;

    let two = app.get(&rating_path, None).await;
    assert_eq!(two.body, json!({ "average_rating": 4.5, "review_count": 2 }));

    let low = post_review(&app, &carol, &product["id"], 1).await;
    let hidden = app
        .json(
            Method::PUT,
            &format!("/api/admin/reviews/{}", low["id"]),
            Some(&admin),
            &json!({ "is_approved": false }),
        )
        .await;
    assert_eq!(hidden.status, StatusCode::OK);
    assert_eq!(hidden.body["is_approved"], false);

    let after = app.get(&rating_path, None).await;
    assert_eq!(after.body, json!({ "average_rating": 4.5, "review_count": 2 }));

    let listed = app
        .get(&format!("/api/products/{}/reviews", product["id"]), None)
        .await;
    let listed = listed.body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["username"], "bob");
    assert_eq!(listed[1]["username"], "alice");
}

#[tokio::test]
async fn test_one_review_per_product_and_user() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let alice = app.register("alice", "alice-password").await;

    let first = post_review(&app, &alice, &product["id"], 5).await;
    assert_eq!(first["username"], "alice");
    assert_eq!(first["is_approved"], true);

    let second = app
        .json(
            Method::POST,
            "/api/reviews",
            Some(&alice),
            &json!({ "product_id": product["id"], "rating": 3 }),
        )
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.detail(), "You have already reviewed this product");

    let queue = app.get("/api/admin/reviews", Some(&admin)).await;
    assert_eq!(queue.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_reviews_store_one() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let alice = app.register("alice", "alice-password").await;
    let body = json!({ "product_id": product["id"], "rating": 5 });

    let (first, second) = tokio::join!(
        app.json(Method::POST, "/api/reviews", Some(&alice), &body),
        app.json(Method::POST, "/api/reviews", Some(&alice), &body),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let queue = app.get("/api/admin/reviews", Some(&admin)).await;
    assert_eq!(queue.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_review_validation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let alice = app.register("alice", "alice-password").await;

    for rating in [0, 6] {
        let response = app
            .json(
                Method::POST,
                "/api/reviews",
                Some(&alice),
                &json!({ "product_id": product["id"], "rating": rating }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    let unknown = app
        .json(
            Method::POST,
            "/api/reviews",
            Some(&alice),
            &json!({ "product_id": 9999, "rating": 5 }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .json(
            Method::POST,
            "/api/reviews",
            None,
            &json!({ "product_id": product["id"], "rating": 5 }),
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moderation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let alice = app.register("alice", "alice-password").await;
    let review = post_review(&app, &alice, &product["id"], 5).await;
    let path = format!("/api/admin/reviews/{}", review["id"]);

    assert_eq!(app.get("/api/admin/reviews", Some(&alice)).await.status, StatusCode::FORBIDDEN);

    let missing = app
        .json(
            Method::PUT,
            "/api/admin/reviews/9999",
            Some(&admin),
            &json!({ "is_approved": true }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "Review not found");

    let deleted = app.delete(&path, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Review deleted successfully");
    assert_eq!(app.delete(&path, Some(&admin)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_follow_their_product_and_outlive_their_author() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let bed = app.create_product(&admin, "Teak Bed", "45000").await;
    let sofa = app.create_product(&admin, "Oak Sofa", "30000").await;
    let alice = app.register("alice", "alice-password").await;
    post_review(&app, &alice, &bed["id"], 5).await;
    post_review(&app, &alice, &sofa["id"], 4).await;

    app.delete(&format!("/api/products/{}", bed["id"]), Some(&admin))
        .await;
    let queue = app.get("/api/admin/reviews", Some(&admin)).await;
    let queue = queue.body.as_array().unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["product_id"], sofa["id"]);

    let users = app.get("/api/users", Some(&admin)).await;
    let alice_id = users
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "alice")
        .unwrap()["id"]
        .clone();
    app.delete(&format!("/api/users/{alice_id}"), Some(&admin))
        .await;

    let listed = app
        .get(&format!("/api/products/{}/reviews", sofa["id"]), None)
        .await;
    assert_eq!(listed.body[0]["username"], "Anonymous");
}
