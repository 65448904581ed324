//! Product review types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rubel_woodworks_core::{ProductId, Rating, ReviewId, UserId};

/// Display name used when a review's author no longer exists.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a review. New reviews are approved.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// A review joined with its author's current username, if the account exists.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    #[sqlx(flatten)]
    pub review: Review,
    pub username: Option<String>,
}

/// A review as returned to clients, annotated with the author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub username: String,
}

impl From<ReviewWithAuthor> for ReviewView {
    fn from(row: ReviewWithAuthor) -> Self {
        Self {
            review: row.review,
            username: row
                .username
                .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_owned()),
        }
    }
}

/// Aggregate of a product's approved reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `0.0` when there are no reviews.
    pub average_rating: f64,
    pub review_count: i64,
}

impl RatingSummary {
    /// Build a summary from a raw mean and count.
    #[must_use]
    pub fn from_mean(mean: Option<f64>, count: i64) -> Self {
        match mean {
            Some(mean) if count > 0 => Self {
                average_rating: (mean * 10.0).round() / 10.0,
                review_count: count,
            },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults_to_zero() {
        let summary = RatingSummary::from_mean(None, 0);
        assert!((summary.average_rating - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn test_summary_rounds_to_one_decimal() {
        let summary = RatingSummary::from_mean(Some(13.0 / 3.0), 3);
        assert!((summary.average_rating - 4.3).abs() < f64::EPSILON);
        assert_eq!(summary.review_count, 3);
    }
}
