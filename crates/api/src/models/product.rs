//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use rubel_woodworks_core::{Category, ProductId};

/// A catalog product with English and Bengali text.
///
/// Serialized with the storefront client's field names (`nameEn`, `nameBn`,
/// `descriptionEn`, `descriptionBn`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name_en: String,
    pub name_bn: String,
    pub description_en: Option<String>,
    pub description_bn: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: Category,
    /// Public reference path of the stored image (e.g. `/static/uploads/<uuid>.jpg`).
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name_en: String,
    pub name_bn: String,
    pub description_en: Option<String>,
    pub description_bn: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub image: String,
}

/// Partial product update; only provided fields are replaced.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name_en: Option<String>,
    pub name_bn: Option<String>,
    pub description_en: Option<String>,
    pub description_bn: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub image: Option<String>,
}
