//! Order workflow.

use rust_decimal::Decimal;

use rubel_woodworks_core::{OrderId, OrderStatus};

use super::auth::{RequestContext, Tier};
use crate::db::{OrderStore, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{NewOrder, Order, OrderStats};

/// Checkout payload. `items` is the client's serialized cart, stored verbatim.
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub total_amount: Decimal,
    pub items: String,
}

/// Order operations.
pub struct OrderService<'a> {
    orders: &'a dyn OrderStore,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(orders: &'a dyn OrderStore) -> Self {
        Self { orders }
    }

    /// Place an order as a guest or, with an identity, on the caller's account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name, phone or items payload
    /// or a negative total.
    pub async fn place(&self, ctx: &RequestContext, input: OrderInput) -> Result<Order> {
        let customer_name = required(input.customer_name, "customer_name")?;
        let customer_phone = required(input.customer_phone, "customer_phone")?;
        let items = required(input.items, "items")?;
        if input.total_amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "total_amount must not be negative".to_owned(),
            ));
        }

        let order = self
            .orders
            .create(&NewOrder {
                user_id: ctx.identity().map(|user| user.id),
                customer_name,
                customer_phone,
                customer_address: input.customer_address,
                total_amount: input.total_amount.round_dp(2),
                items,
            })
            .await?;

        let order_id = order.id.to_string();
        add_breadcrumb("order", "Order placed", Some(&[("order_id", order_id.as_str())]));
        tracing::info!(
            order_id = %order.id,
            guest = order.user_id.is_none(),
            "Order placed"
        );
        Ok(order)
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier.
    pub async fn list_all(&self, ctx: &RequestContext) -> Result<Vec<Order>> {
        ctx.require(Tier::Admin)?;
        Ok(self.orders.list_all().await?)
    }

    /// The caller's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` without an identity.
    pub async fn list_mine(&self, ctx: &RequestContext) -> Result<Vec<Order>> {
        let caller = ctx.require(Tier::Authenticated)?;
        Ok(self.orders.list_for_user(caller.id).await?)
    }

    /// Overwrite an order's status.
    ///
    /// The raw value is parsed here so that anything outside the closed set
    /// is rejected before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidStatus` for an unknown status and
    /// `AppError::NotFound` if there is no such order.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: OrderId,
        status: &str,
    ) -> Result<Order> {
        ctx.require(Tier::Admin)?;
        let status: OrderStatus = status.parse()?;

        let order = self
            .orders
            .update_status(id, status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => order_not_found(),
                other => other.into(),
            })?;

        tracing::info!(order_id = %id, status = %status, "Order status updated");
        Ok(order)
    }

    /// Remove an order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such order.
    pub async fn delete(&self, ctx: &RequestContext, id: OrderId) -> Result<()> {
        ctx.require(Tier::Admin)?;
        self.orders.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => order_not_found(),
            other => other.into(),
        })?;

        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier.
    pub async fn stats(&self, ctx: &RequestContext) -> Result<OrderStats> {
        ctx.require(Tier::Admin)?;
        Ok(self.orders.stats().await?)
    }
}

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_owned())
}

fn required(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value)
}
