//! Integration test harness for Rubel Woodworks.
//!
//! Each [`TestApp`] is the full production router (minus the rate limiter)
//! over a fresh in-memory store and a temporary upload directory. Requests
//! are driven in-process with `tower::ServiceExt::oneshot`, so no database
//! or listening socket is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rubel-woodworks-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use axum::{
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::Duration;
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use rubel_woodworks_api::App;
use rubel_woodworks_api::config::{ApiConfig, BootstrapAdminConfig, TokenConfig};
use rubel_woodworks_api::db::Stores;
use rubel_woodworks_api::services::auth::ensure_bootstrap_admin;
use rubel_woodworks_api::state::AppState;

/// Bootstrap admin created for every test app.
pub const ADMIN_USERNAME: &str = "admin";
/// Password of [`ADMIN_USERNAME`].
pub const ADMIN_PASSWORD: &str = "bootstrap-admin-pass";
/// Signing secret used by test apps.
pub const TOKEN_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";

const MULTIPART_BOUNDARY: &str = "rubel-test-boundary";

/// Configuration pointing uploads at `upload_dir`.
#[must_use]
pub fn test_config(upload_dir: PathBuf) -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        token: TokenConfig {
            secret: SecretString::from(TOKEN_SECRET),
            ttl: Duration::minutes(30),
        },
        upload_dir,
        max_upload_bytes: 1024 * 1024,
        allowed_origins: Vec::new(),
        bootstrap_admin: BootstrapAdminConfig {
            username: ADMIN_USERNAME.to_owned(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or a JSON string holding the raw text for non-JSON bodies.
    pub body: Value,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// The `detail` message of an error body.
    #[must_use]
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }
}

/// An image part for [`TestApp::multipart`].
pub struct ImagePart<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Full application over an in-memory store.
pub struct TestApp {
    pub state: AppState,
    router: App,
    uploads: TempDir,
}

impl TestApp {
    /// Build an app with the bootstrap admin in place.
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let config = test_config(uploads.path().to_path_buf());
        let stores = Stores::in_memory();
        ensure_bootstrap_admin(stores.users.as_ref(), &config.bootstrap_admin)
            .await
            .unwrap();

        let state = AppState::new(config, stores);
        let router = rubel_woodworks_api::app(state.clone(), None);
        Self {
            state,
            router,
            uploads,
        }
    }

    /// Directory uploaded images land in.
    #[must_use]
    pub fn upload_dir(&self) -> &std::path::Path {
        self.uploads.path()
    }

    /// Number of files currently in the upload directory.
    #[must_use]
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path()).map_or(0, Iterator::count)
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse {
            status,
            headers,
            body,
            bytes: bytes.to_vec(),
        }
    }

    /// Send a bodiless request.
    pub async fn call(&self, method: Method, path: &str, token: Option<&str>) -> TestResponse {
        let request = builder(method, path, token).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::GET, path, token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::DELETE, path, token).await
    }

    /// Send a JSON body.
    pub async fn json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> TestResponse {
        let request = builder(method, path, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a URL-encoded form.
    pub async fn form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let encoded = fields
            .iter()
            .map(|(key, value)| format!("{}={}", form_escape(key), form_escape(value)))
            .collect::<Vec<_>>()
            .join("&");
        let request = builder(Method::POST, path, None)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encoded))
            .unwrap();
        self.send(request).await
    }

    /// Send a multipart form with text fields and an optional image.
    pub async fn multipart(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
        image: Option<ImagePart<'_>>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(image) = image {
            body.extend_from_slice(
                format!(
                    "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    image.file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(image.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let request = builder(method, path, token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .form(
                "/api/auth/login",
                &[("username", username), ("password", password)],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["access_token"].as_str().unwrap().to_owned()
    }

    /// Token of the bootstrap admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Register a customer and return their token.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                &json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "registration failed: {:?}",
            response.body
        );
        response.body["access_token"].as_str().unwrap().to_owned()
    }

    /// Create a product as admin and return its JSON.
    pub async fn create_product(&self, admin_token: &str, name: &str, price: &str) -> Value {
        let response = self
            .multipart(
                Method::POST,
                "/api/products",
                Some(admin_token),
                &[
                    ("nameEn", name),
                    ("nameBn", name),
                    ("price", price),
                    ("category", "bed"),
                    ("descriptionEn", "Solid teak"),
                ],
                Some(ImagePart {
                    file_name: "photo.jpg",
                    bytes: b"\xFF\xD8\xFFfake-jpeg",
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "product creation failed: {:?}",
            response.body
        );
        response.body
    }

    /// Place an order and return its id.
    pub async fn place_order(&self, token: Option<&str>, phone: &str, total: f64) -> i64 {
        let response = self
            .json(
                Method::POST,
                "/api/orders",
                token,
                &json!({
                    "customer_name": "Karim",
                    "customer_phone": phone,
                    "customer_address": "Dhaka",
                    "total_amount": total,
                    "items": "[{\"id\":1,\"qty\":1}]",
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "order failed: {:?}",
            response.body
        );
        response.body["order_id"].as_i64().unwrap()
    }
}

fn builder(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(path);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

/// Minimal `application/x-www-form-urlencoded` escaping.
fn form_escape(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_owned(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}
