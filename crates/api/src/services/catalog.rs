//! Catalog service.
//!
//! Browsing is public. Every mutation is admin-only and keeps the image
//! directory in step with the rows: a replaced or deleted product's old image
//! is removed best-effort, and a freshly saved image is removed again if the
//! row write fails.

use rust_decimal::Decimal;

use rubel_woodworks_core::{Category, ProductId};

use super::auth::{RequestContext, Tier};
use crate::db::{ProductStore, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductChanges};
use crate::uploads::ImageStore;

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Product fields as submitted. Creation needs every field except the
/// descriptions; an update applies whatever is present.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name_en: Option<String>,
    pub name_bn: Option<String>,
    pub description_en: Option<String>,
    pub description_bn: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub image: Option<ImageUpload>,
}

/// Catalog operations.
pub struct CatalogService<'a> {
    products: &'a dyn ProductStore,
    images: &'a ImageStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductStore, images: &'a ImageStore) -> Self {
        Self { products, images }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such product.
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.products.get(id).await?.ok_or_else(product_not_found)
    }

    /// Create a product with its image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier and `AppError::Validation`
    /// for a missing field, blank name or negative price.
    pub async fn create(&self, ctx: &RequestContext, input: ProductInput) -> Result<Product> {
        ctx.require(Tier::Admin)?;

        let name_en = required_text(input.name_en, "nameEn")?;
        let name_bn = required_text(input.name_bn, "nameBn")?;
        let price = checked_price(input.price.ok_or_else(|| missing("price"))?)?;
        let category = input.category.ok_or_else(|| missing("category"))?;
        let upload = input.image.ok_or_else(|| missing("image"))?;

        let image = self.images.save(&upload.bytes, &upload.file_name).await?;
        let draft = NewProduct {
            name_en,
            name_bn,
            description_en: input.description_en,
            description_bn: input.description_bn,
            price,
            category,
            image,
        };

        match self.products.create(&draft).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, "Product created");
                Ok(product)
            }
            Err(e) => {
                self.images.remove(&draft.image).await;
                Err(e.into())
            }
        }
    }

    /// Replace the provided fields, and the image if one was uploaded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier, `AppError::NotFound` if the
    /// product is absent and `AppError::Validation` for bad fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        input: ProductInput,
    ) -> Result<Product> {
        ctx.require(Tier::Admin)?;

        let existing = self.get(id).await?;
        let mut changes = ProductChanges {
            name_en: input.name_en.map(|v| non_blank(v, "nameEn")).transpose()?,
            name_bn: input.name_bn.map(|v| non_blank(v, "nameBn")).transpose()?,
            description_en: input.description_en,
            description_bn: input.description_bn,
            price: input.price.map(checked_price).transpose()?,
            category: input.category,
            image: None,
        };

        if let Some(upload) = input.image {
            changes.image = Some(self.images.save(&upload.bytes, &upload.file_name).await?);
        }

        match self.products.update(id, &changes).await {
            Ok(product) => {
                if changes.image.is_some() {
                    self.images.remove(&existing.image).await;
                }
                tracing::info!(product_id = %product.id, "Product updated");
                Ok(product)
            }
            Err(e) => {
                if let Some(image) = &changes.image {
                    self.images.remove(image).await;
                }
                Err(match e {
                    RepositoryError::NotFound => product_not_found(),
                    other => other.into(),
                })
            }
        }
    }

    /// Delete a product, its reviews and its image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier and `AppError::NotFound` if
    /// the product is absent.
    pub async fn delete(&self, ctx: &RequestContext, id: ProductId) -> Result<()> {
        ctx.require(Tier::Admin)?;

        let removed = self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => product_not_found(),
            other => other.into(),
        })?;
        self.images.remove(&removed.image).await;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_owned())
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{field} is required"))
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    non_blank(value.ok_or_else(|| missing(field))?, field)
}

fn non_blank(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

/// Prices are non-negative and kept to two decimal places.
fn checked_price(price: Decimal) -> Result<Decimal> {
    if price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".to_owned()));
    }
    Ok(price.round_dp(2))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rubel_woodworks_core::UserId;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::User;

    fn admin() -> RequestContext {
        RequestContext::authenticated(User {
            id: UserId::new(1),
            username: "admin".to_owned(),
            is_admin: true,
            created_at: Utc::now(),
        })
    }

    fn input(image: &[u8]) -> ProductInput {
        ProductInput {
            name_en: Some("Teak Sofa".to_owned()),
            name_bn: Some("সেগুন সোফা".to_owned()),
            description_en: Some("Three seater".to_owned()),
            description_bn: None,
            price: Some(Decimal::new(3_250_050, 2)),
            category: Some(Category::Sofa),
            image: Some(ImageUpload {
                file_name: "sofa.jpg".to_owned(),
                bytes: image.to_vec(),
            }),
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();
        let images = ImageStore::new(dir.path());
        let catalog = CatalogService::new(&store, &images);

        let err = catalog
            .create(&RequestContext::anonymous(), input(b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();
        let images = ImageStore::new(dir.path());
        let catalog = CatalogService::new(&store, &images);

        let mut no_image = input(b"x");
        no_image.image = None;
        assert!(matches!(
            catalog.create(&admin(), no_image).await,
            Err(AppError::Validation(_))
        ));

        let mut negative = input(b"x");
        negative.price = Some(Decimal::new(-1, 0));
        assert!(matches!(
            catalog.create(&admin(), negative).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_image_replacement_removes_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();
        let images = ImageStore::new(dir.path());
        let catalog = CatalogService::new(&store, &images);

        let created = catalog.create(&admin(), input(b"old")).await.unwrap();
        assert_eq!(images.read(&created.image).await.unwrap(), b"old");

        let patch = ProductInput {
            price: Some(Decimal::new(30_000, 0)),
            image: Some(ImageUpload {
                file_name: "sofa-v2.png".to_owned(),
                bytes: b"new".to_vec(),
            }),
            ..ProductInput::default()
        };
        let updated = catalog.update(&admin(), created.id, patch).await.unwrap();

        assert_eq!(updated.name_en, "Teak Sofa");
        assert_eq!(updated.price, Decimal::new(30_000, 0));
        assert_ne!(updated.image, created.image);
        assert_eq!(images.read(&updated.image).await.unwrap(), b"new");
        assert!(images.read(&created.image).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();
        let images = ImageStore::new(dir.path());
        let catalog = CatalogService::new(&store, &images);

        let created = catalog.create(&admin(), input(b"img")).await.unwrap();
        catalog.delete(&admin(), created.id).await.unwrap();

        assert!(images.read(&created.image).await.is_err());
        assert!(matches!(
            catalog.get(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete(&admin(), created.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
