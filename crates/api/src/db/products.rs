//! Product repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use rubel_woodworks_core::ProductId;

use super::{ProductStore, RepositoryError};
use crate::models::{NewProduct, Product, ProductChanges};

/// Repository for catalog database operations.
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_bn, description_en, description_bn,
                   price, category, image, created_at, updated_at
            FROM products
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_bn, description_en, description_bn,
                   price, category, image, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products
                (name_en, name_bn, description_en, description_bn, price, category, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name_en, name_bn, description_en, description_bn,
                      price, category, image, created_at, updated_at
            ",
        )
        .bind(&product.name_en)
        .bind(&product.name_bn)
        .bind(product.description_en.as_deref())
        .bind(product.description_bn.as_deref())
        .bind(product.price)
        .bind(product.category)
        .bind(&product.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET name_en = COALESCE($2, name_en),
                name_bn = COALESCE($3, name_bn),
                description_en = COALESCE($4, description_en),
                description_bn = COALESCE($5, description_bn),
                price = COALESCE($6, price),
                category = COALESCE($7, category),
                image = COALESCE($8, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name_en, name_bn, description_en, description_bn,
                      price, category, image, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name_en.as_deref())
        .bind(changes.name_bn.as_deref())
        .bind(changes.description_en.as_deref())
        .bind(changes.description_bn.as_deref())
        .bind(changes.price)
        .bind(changes.category)
        .bind(changes.image.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        // Reviews go with the product via ON DELETE CASCADE.
        let product = sqlx::query_as::<_, Product>(
            r"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name_en, name_bn, description_en, description_bn,
                      price, category, image, created_at, updated_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }
}
