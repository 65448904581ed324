//! Product route handlers.
//!
//! Create and update take `multipart/form-data`: text fields named as the
//! storefront client sends them (`nameEn`, `nameBn`, `descriptionEn`,
//! `descriptionBn`, `price`, `category`) plus an `image` file part.

use std::str::FromStr;

use axum::{
    Json,
    extract::{
        State,
        multipart::{Multipart, MultipartError},
    },
};
use rust_decimal::Decimal;

use rubel_woodworks_core::{Category, ProductId};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::extract::ApiPath;
use crate::middleware::Caller;
use crate::models::Product;
use crate::services::auth::{Tier, authorize};
use crate::services::catalog::{ImageUpload, ProductInput};
use crate::state::AppState;

/// List every product.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

/// Show one product.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get(id).await?))
}

/// Create a product from a multipart form.
///
/// The caller is checked before the body is read.
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    multipart: Multipart,
) -> Result<Json<Product>> {
    authorize(&ctx, Tier::Admin)?;
    let input = read_product_form(multipart).await?;
    Ok(Json(state.catalog().create(&ctx, input).await?))
}

/// Update the fields present in a multipart form.
pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<ProductId>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    authorize(&ctx, Tier::Admin)?;
    let input = read_product_form(multipart).await?;
    Ok(Json(state.catalog().update(&ctx, id, input).await?))
}

/// Delete a product.
pub async fn destroy(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    state.catalog().delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Collect the known form parts into a [`ProductInput`]. Unknown parts are
/// skipped; an empty `image` part counts as no image.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductInput> {
    let mut input = ProductInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(bad_form)?;
            if !bytes.is_empty() {
                input.image = Some(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field.text().await.map_err(bad_form)?;
        match name.as_str() {
            "nameEn" => input.name_en = Some(text),
            "nameBn" => input.name_bn = Some(text),
            "descriptionEn" => input.description_en = Some(text),
            "descriptionBn" => input.description_bn = Some(text),
            "price" => input.price = Some(parse_price(&text)?),
            "category" => input.category = Some(Category::from_str(text.trim())?),
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(input)
}

fn parse_price(text: &str) -> Result<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| AppError::Validation(format!("Invalid price: {text}")))
}

#[allow(clippy::needless_pass_by_value)]
fn bad_form(err: MultipartError) -> AppError {
    AppError::Validation(err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 1500.50 ").unwrap(), Decimal::new(150_050, 2));
        assert_eq!(parse_price("12").unwrap(), Decimal::from(12));
        assert!(matches!(parse_price("cheap"), Err(AppError::Validation(_))));
    }
}
