//! Order route handlers.

use axum::{
    Json,
    extract::State,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rubel_woodworks_core::OrderId;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::Caller;
use crate::models::{Order, OrderStats};
use crate::services::orders::OrderInput;
use crate::state::AppState;

/// Checkout body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub items: String,
}

/// Checkout acknowledgement.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub message: &'static str,
    pub order_id: OrderId,
}

/// Status change body.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Place an order, as a guest or signed in.
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<Json<OrderCreated>> {
    let order = state
        .orders()
        .place(
            &ctx,
            OrderInput {
                customer_name: body.customer_name,
                customer_phone: body.customer_phone,
                customer_address: body.customer_address,
                total_amount: body.total_amount,
                items: body.items,
            },
        )
        .await?;

    Ok(Json(OrderCreated {
        message: "Order created successfully",
        order_id: order.id,
    }))
}

/// Every order, newest first.
pub async fn index(State(state): State<AppState>, Caller(ctx): Caller) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list_all(&ctx).await?))
}

/// The caller's own orders.
pub async fn mine(State(state): State<AppState>, Caller(ctx): Caller) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list_mine(&ctx).await?))
}

/// Move an order to another status.
pub async fn update_status(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().update_status(&ctx, id, &body.status).await?))
}

/// Delete an order.
pub async fn destroy(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<MessageResponse>> {
    state.orders().delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}

/// Dashboard totals.
pub async fn stats(State(state): State<AppState>, Caller(ctx): Caller) -> Result<Json<OrderStats>> {
    Ok(Json(state.orders().stats(&ctx).await?))
}
