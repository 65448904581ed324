//! Order repository for database operations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use rubel_woodworks_core::{OrderId, OrderStatus, UserId};

use super::{OrderStore, RepositoryError, write_error};
use crate::models::{NewOrder, Order, OrderStats};

/// Repository for order database operations.
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders
                (user_id, customer_name, customer_phone, customer_address, total_amount, items)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, customer_name, customer_phone, customer_address,
                      total_amount, items, status, created_at
            ",
        )
        .bind(order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.customer_address.as_deref())
        .bind(order.total_amount)
        .bind(&order.items)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "order conflicts with an existing row"))
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, customer_name, customer_phone, customer_address,
                   total_amount, items, status, created_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, customer_name, customer_phone, customer_address,
                   total_amount, items, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, customer_name, customer_phone, customer_address,
                      total_amount, items, status, created_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn stats(&self) -> Result<OrderStats, RepositoryError> {
        let (total_sales, total_orders, total_customers, total_products) =
            sqlx::query_as::<_, (Decimal, i64, i64, i64)>(
                r"
                SELECT
                    (SELECT COALESCE(SUM(total_amount), 0) FROM orders),
                    (SELECT COUNT(*) FROM orders),
                    (SELECT COUNT(DISTINCT customer_phone) FROM orders),
                    (SELECT COUNT(*) FROM products)
                ",
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(OrderStats {
            total_sales,
            total_orders,
            total_customers,
            total_products,
        })
    }
}
