//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use rubel_woodworks_core::{OrderId, OrderStatus, UserId};

/// A placed order.
///
/// `items` is the client's serialized cart. It is stored and returned
/// verbatim and never parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Owning account, `None` for guest checkouts.
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub items: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert an order. Status always starts as pending.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub total_amount: Decimal,
    pub items: String,
}

/// Back-office dashboard figures. Every field is zero on an empty store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub total_orders: i64,
    /// Distinct customer phone numbers across all orders.
    pub total_customers: i64,
    pub total_products: i64,
}
