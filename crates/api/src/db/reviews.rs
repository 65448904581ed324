//! Review repository for database operations.
//!
//! Author names are resolved with a `LEFT JOIN` so reviews by deleted
//! accounts still list, with a `NULL` username.

use async_trait::async_trait;
use sqlx::PgPool;

use rubel_woodworks_core::{ProductId, ReviewId};

use super::{RepositoryError, ReviewStore, write_error};
use crate::models::{NewReview, Review, ReviewWithAuthor};

/// Repository for review database operations.
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        sqlx::query_as::<_, Review>(
            r"
            INSERT INTO reviews (product_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, user_id, rating, comment, is_approved, created_at
            ",
        )
        .bind(review.product_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "review already exists"))
    }

    async fn list_approved(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r"
            SELECT r.id, r.product_id, r.user_id, r.rating, r.comment,
                   r.is_approved, r.created_at, u.username
            FROM reviews r
            LEFT JOIN users u ON u.id = r.user_id
            WHERE r.product_id = $1 AND r.is_approved
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_all(&self) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r"
            SELECT r.id, r.product_id, r.user_id, r.rating, r.comment,
                   r.is_approved, r.created_at, u.username
            FROM reviews r
            LEFT JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn rating_stats(
        &self,
        product_id: ProductId,
    ) -> Result<(Option<f64>, i64), RepositoryError> {
        let stats = sqlx::query_as::<_, (Option<f64>, i64)>(
            r"
            SELECT AVG(rating)::float8, COUNT(*)
            FROM reviews
            WHERE product_id = $1 AND is_approved
            ",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn set_approval(
        &self,
        id: ReviewId,
        approved: bool,
    ) -> Result<ReviewWithAuthor, RepositoryError> {
        let review = sqlx::query_as::<_, ReviewWithAuthor>(
            r"
            WITH updated AS (
                UPDATE reviews
                SET is_approved = $2
                WHERE id = $1
                RETURNING id, product_id, user_id, rating, comment, is_approved, created_at
            )
            SELECT updated.id, updated.product_id, updated.user_id, updated.rating,
                   updated.comment, updated.is_approved, updated.created_at, u.username
            FROM updated
            LEFT JOIN users u ON u.id = updated.user_id
            ",
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await?;

        review.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
