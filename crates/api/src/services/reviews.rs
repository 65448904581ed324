//! Review workflow.
//!
//! Listing and rating summaries are public, writing needs an account, and
//! moderation is admin-only. The one-review-per-product rule is the store's
//! unique constraint; this layer only translates the conflict.

use rubel_woodworks_core::{ProductId, Rating, ReviewId};

use super::auth::{RequestContext, Tier};
use crate::db::{ProductStore, RepositoryError, ReviewStore};
use crate::error::{AppError, Result};
use crate::models::{NewReview, RatingSummary, ReviewView, ReviewWithAuthor};

/// Review operations.
pub struct ReviewService<'a> {
    reviews: &'a dyn ReviewStore,
    products: &'a dyn ProductStore,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(reviews: &'a dyn ReviewStore, products: &'a dyn ProductStore) -> Self {
        Self { reviews, products }
    }

    /// Review a product as the caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRating` outside 1..=5, `AppError::NotFound`
    /// for an unknown product and `AppError::DuplicateReview` if the caller
    /// already reviewed it.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        product_id: ProductId,
        rating: i64,
        comment: Option<String>,
    ) -> Result<ReviewView> {
        let caller = ctx.require(Tier::Authenticated)?;
        let rating = Rating::new(rating)?;

        if self.products.get(product_id).await?.is_none() {
            return Err(product_not_found());
        }

        let review = self
            .reviews
            .create(&NewReview {
                product_id,
                user_id: caller.id,
                rating,
                comment: comment.filter(|c| !c.trim().is_empty()),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AppError::DuplicateReview,
                RepositoryError::NotFound => product_not_found(),
                other => other.into(),
            })?;

        tracing::info!(
            review_id = %review.id,
            product_id = %product_id,
            user_id = %caller.id,
            "Review created"
        );
        Ok(ReviewWithAuthor {
            review,
            username: Some(caller.username.clone()),
        }
        .into())
    }

    /// Approved reviews of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_for_product(&self, product_id: ProductId) -> Result<Vec<ReviewView>> {
        let rows = self.reviews.list_approved(product_id).await?;
        Ok(rows.into_iter().map(ReviewView::from).collect())
    }

    /// Mean and count of a product's approved ratings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn rating_summary(&self, product_id: ProductId) -> Result<RatingSummary> {
        let (mean, count) = self.reviews.rating_stats(product_id).await?;
        Ok(RatingSummary::from_mean(mean, count))
    }

    /// Every review, approved or not, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier.
    pub async fn list_all_for_moderation(&self, ctx: &RequestContext) -> Result<Vec<ReviewView>> {
        ctx.require(Tier::Admin)?;
        let rows = self.reviews.list_all().await?;
        Ok(rows.into_iter().map(ReviewView::from).collect())
    }

    /// Approve or hide a review.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such review.
    pub async fn set_approval(
        &self,
        ctx: &RequestContext,
        id: ReviewId,
        approved: bool,
    ) -> Result<ReviewView> {
        ctx.require(Tier::Admin)?;
        let row = self
            .reviews
            .set_approval(id, approved)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => review_not_found(),
                other => other.into(),
            })?;

        tracing::info!(review_id = %id, approved, "Review moderated");
        Ok(row.into())
    }

    /// Remove a review.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such review.
    pub async fn delete(&self, ctx: &RequestContext, id: ReviewId) -> Result<()> {
        ctx.require(Tier::Admin)?;
        self.reviews.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => review_not_found(),
            other => other.into(),
        })?;

        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_owned())
}

fn review_not_found() -> AppError {
    AppError::NotFound("Review not found".to_owned())
}
