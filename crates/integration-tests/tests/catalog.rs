//! Integration tests for the catalog and product images.

use axum::http::{Method, StatusCode};

use rubel_woodworks_integration_tests::{ImagePart, TestApp};

#[tokio::test]
async fn test_product_listing_is_public() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    assert_eq!(app.get("/api/products", None).await.body, serde_json::json!([]));

    let bed = app.create_product(&admin, "Teak Bed", "45000").await;
    let sofa = app.create_product(&admin, "Oak Sofa", "30000.50").await;

    let listing = app.get("/api/products", None).await;
    assert_eq!(listing.status, StatusCode::OK);
    let products = listing.body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["id"], bed["id"]);
    assert_eq!(products[1]["id"], sofa["id"]);

    let shown = app
        .get(&format!("/api/products/{}", sofa["id"]), None)
        .await;
    assert_eq!(shown.status, StatusCode::OK);
    assert_eq!(shown.body["nameEn"], "Oak Sofa");
    assert_eq!(shown.body["descriptionEn"], "Solid teak");
    assert_eq!(shown.body["category"], "bed");
    assert!((shown.body["price"].as_f64().unwrap() - 30000.5).abs() < 1e-9);

    let missing = app.get("/api/products/9999", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "Product not found");
}

#[tokio::test]
async fn test_image_round_trip() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let old_image = product["image"].as_str().unwrap().to_owned();
    assert!(old_image.starts_with("/static/uploads/"));
    assert!(old_image.ends_with(".jpg"));

    let served = app.get(&old_image, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.bytes, b"\xFF\xD8\xFFfake-jpeg");
    assert_eq!(app.stored_image_count(), 1);

    let updated = app
        .multipart(
            Method::PUT,
            &format!("/api/products/{}", product["id"]),
            Some(&admin),
            &[("price", "47000")],
            Some(ImagePart {
                file_name: "new.png",
                bytes: b"\x89PNGnew-image",
            }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let new_image = updated.body["image"].as_str().unwrap().to_owned();
    assert_ne!(new_image, old_image);
    assert_eq!(updated.body["nameEn"], "Teak Bed");
    assert!((updated.body["price"].as_f64().unwrap() - 47000.0).abs() < 1e-9);

    assert_eq!(app.get(&old_image, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&new_image, None).await.bytes, b"\x89PNGnew-image");
    assert_eq!(app.stored_image_count(), 1);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;

    let updated = app
        .multipart(
            Method::PUT,
            &format!("/api/products/{}", product["id"]),
            Some(&admin),
            &[("nameBn", "সেগুন খাট"), ("category", "dining")],
            None,
        )
        .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["nameBn"], "সেগুন খাট");
    assert_eq!(updated.body["category"], "dining");
    assert_eq!(updated.body["nameEn"], "Teak Bed");
    assert_eq!(updated.body["image"], product["image"]);
}

#[tokio::test]
async fn test_delete_removes_image() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let image = product["image"].as_str().unwrap().to_owned();

    let deleted = app
        .delete(&format!("/api/products/{}", product["id"]), Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Product deleted successfully");

    assert_eq!(app.stored_image_count(), 0);
    assert_eq!(app.get(&image, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&format!("/api/products/{}", product["id"]), None)
            .await
            .status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let image = || {
        Some(ImagePart {
            file_name: "photo.jpg",
            bytes: b"jpeg",
        })
    };

    let cases: [(&[(&str, &str)], _); 4] = [
        (&[("nameEn", "Bed"), ("nameBn", "Bed"), ("price", "10"), ("category", "table")], image()),
        (&[("nameEn", "Bed"), ("nameBn", "Bed"), ("price", "-1"), ("category", "bed")], image()),
        (&[("nameEn", "Bed"), ("nameBn", "Bed"), ("price", "ten"), ("category", "bed")], image()),
        (&[("nameEn", "Bed"), ("nameBn", "Bed"), ("price", "10"), ("category", "bed")], None),
    ];
    for (fields, image) in cases {
        let response = app
            .multipart(Method::POST, "/api/products", Some(&admin), fields, image)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{fields:?}");
    }
    assert_eq!(app.stored_image_count(), 0);
}

#[tokio::test]
async fn test_mutations_require_admin() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.register("rahim", "furniture-fan").await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let path = format!("/api/products/{}", product["id"]);

    let anonymous = app
        .multipart(Method::POST, "/api/products", None, &[("nameEn", "Bed")], None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let update = app
        .multipart(Method::PUT, &path, Some(&customer), &[("nameEn", "Mine")], None)
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);

    assert_eq!(app.delete(&path, Some(&customer)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get(&path, None).await.body["nameEn"], "Teak Bed");
}

#[tokio::test]
async fn test_gate_runs_before_form_parsing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.register("rahim", "furniture-fan").await;
    let product = app.create_product(&admin, "Teak Bed", "45000").await;
    let path = format!("/api/products/{}", product["id"]);
    let bad = [("price", "ten"), ("category", "throne")];

    let created = app
        .multipart(Method::POST, "/api/products", Some(&customer), &bad, None)
        .await;
    assert_eq!(created.status, StatusCode::FORBIDDEN);

    let updated = app
        .multipart(Method::PUT, &path, Some(&customer), &bad, None)
        .await;
    assert_eq!(updated.status, StatusCode::FORBIDDEN);

    let anonymous = app
        .multipart(Method::PUT, &path, None, &bad, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_numeric_id_uses_error_shape() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    for path in [
        "/api/products/teak",
        "/api/products/teak/reviews",
        "/api/users/abc",
        "/api/orders/abc",
        "/api/admin/reviews/abc",
    ] {
        let method = if path.starts_with("/api/orders") || path.starts_with("/api/admin") {
            Method::DELETE
        } else {
            Method::GET
        };
        let response = app.call(method, path, Some(&admin)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert!(!response.detail().is_empty(), "{path}");
    }
}
