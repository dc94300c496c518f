//! `PostgreSQL` implementation of the `OrderRepository` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use mercado_core::error::DomainError;
use mercado_orders::domain::models::{Order, OrderItem, OrderStatus};
use mercado_orders::domain::repository::OrderRepository;

use crate::infra;

/// PostgreSQL-backed order repository.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a new `PgOrderRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &PgRow, items: Vec<OrderItem>) -> Result<Order, DomainError> {
        let status: String = row.get("status");
        let status = status
            .parse::<OrderStatus>()
            .map_err(DomainError::Infrastructure)?;

        Ok(Order {
            id: row.get("id"),
            user_id: row.get("user_id"),
            items,
            total_items: row.get("total_items"),
            total_amount: row.get("total_amount"),
            status,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, DomainError> {
        let rows = sqlx::query(
            "SELECT oi.product_id, oi.quantity, oi.price, p.name
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows
            .iter()
            .map(|row| OrderItem {
                product_id: row.get("product_id"),
                quantity: row.get("quantity"),
                price: row.get("price"),
                name: row.get("name"),
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, user_id: Uuid, items: &[OrderItem]) -> Result<Order, DomainError> {
        let total_items: i32 = items.iter().map(|i| i.quantity).sum();
        let total_amount: f64 = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();

        let mut tx = self.pool.begin().await.map_err(infra)?;

        let row = sqlx::query(
            "INSERT INTO orders (user_id, total_items, total_amount, status)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, total_items, total_amount, status, created_at, updated_at",
        )
        .bind(user_id)
        .bind(total_items)
        .bind(total_amount)
        .bind(OrderStatus::Created.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(infra)?;

        let order_id: Uuid = row.get("id");
        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(infra)?;
        }

        tx.commit().await.map_err(infra)?;

        Self::row_to_order(&row, items.to_vec())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let Some(row) = sqlx::query(
            "SELECT id, user_id, total_items, total_amount, status, created_at, updated_at
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?
        else {
            return Ok(None);
        };

        let items = self.load_items(id).await?;
        Ok(Some(Self::row_to_order(&row, items)?))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, user_id, total_items, total_amount, status, created_at, updated_at
             FROM orders WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let order_id: Uuid = row.get("id");
            let items = self.load_items(order_id).await?;
            orders.push(Self::row_to_order(row, items)?);
        }
        Ok(orders)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        Ok(result.rows_affected() > 0)
    }
}
