//! Request extractors whose rejections use the API's error shape.
//!
//! Axum's own `Json`/`Form`/`Path` reject with plain-text bodies. These
//! wrappers route the rejection through [`AppError`], so a malformed body or
//! a non-numeric id comes back as `400 {"detail": "..."}` like every other
//! validation failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// URL-encoded form body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct ApiForm<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
