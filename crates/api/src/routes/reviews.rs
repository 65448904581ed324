//! Review and moderation route handlers.

use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;

use rubel_woodworks_core::{ProductId, ReviewId};

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::Caller;
use crate::models::{RatingSummary, ReviewView};
use crate::state::AppState;

/// New review body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: ProductId,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Moderation body.
#[derive(Debug, Deserialize)]
pub struct ApprovalUpdate {
    pub is_approved: bool,
}

/// Approved reviews of a product.
pub async fn for_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Vec<ReviewView>>> {
    Ok(Json(state.reviews().list_for_product(id).await?))
}

/// Average rating of a product.
pub async fn rating(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<RatingSummary>> {
    Ok(Json(state.reviews().rating_summary(id).await?))
}

/// Review a product.
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(body): ApiJson<CreateReviewRequest>,
) -> Result<Json<ReviewView>> {
    let review = state
        .reviews()
        .create(&ctx, body.product_id, body.rating, body.comment)
        .await?;
    Ok(Json(review))
}

/// Every review for moderation.
pub async fn moderation_queue(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<Vec<ReviewView>>> {
    Ok(Json(state.reviews().list_all_for_moderation(&ctx).await?))
}

/// Approve or hide a review.
pub async fn moderate(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(body): ApiJson<ApprovalUpdate>,
) -> Result<Json<ReviewView>> {
    Ok(Json(
        state.reviews().set_approval(&ctx, id, body.is_approved).await?,
    ))
}

/// Delete a review.
pub async fn destroy(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<ReviewId>,
) -> Result<Json<MessageResponse>> {
    state.reviews().delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
