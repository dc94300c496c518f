//! `PostgreSQL` implementation of the `CartRepository` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use mercado_cart::domain::models::{Cart, CartItem};
use mercado_cart::domain::repository::CartRepository;
use mercado_core::error::DomainError;

use crate::infra;

/// PostgreSQL-backed cart repository.
#[derive(Debug, Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Creates a new `PgCartRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_cart(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        let Some(cart_row) = sqlx::query("SELECT id, updated_at FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?
        else {
            return Ok(None);
        };

        let cart_id: Uuid = cart_row.get("id");
        let item_rows = sqlx::query(
            "SELECT ci.product_id, ci.quantity, ci.price, p.name
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        let items: Vec<CartItem> = item_rows
            .iter()
            .map(|row| CartItem {
                product_id: row.get("product_id"),
                quantity: row.get("quantity"),
                price: row.get("price"),
                name: row.get("name"),
            })
            .collect();

        Ok(Some(Cart {
            id: cart_id,
            user_id,
            total_items: items.iter().map(|i| i.quantity).sum(),
            total_amount: items
                .iter()
                .map(|i| i.price * f64::from(i.quantity))
                .sum(),
            items,
            updated_at: cart_row.get("updated_at"),
        }))
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn add_item(&self, user_id: Uuid, item: &CartItem) -> Result<Cart, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        let cart_row = sqlx::query(
            "INSERT INTO carts (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
             RETURNING id",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(infra)?;
        let cart_id: Uuid = cart_row.get("id");

        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, price)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                           price = EXCLUDED.price",
        )
        .bind(cart_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await
        .map_err(infra)?;

        tx.commit().await.map_err(infra)?;

        self.load_cart(user_id)
            .await?
            .ok_or_else(|| DomainError::Infrastructure("cart vanished after insert".into()))
    }

    async fn remove_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Cart>, DomainError> {
        let Some(cart) = self.load_cart(user_id).await? else {
            return Ok(None);
        };

        let result = sqlx::query(
            "DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart.id)
        .bind(product_id)
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1")
            .bind(cart.id)
            .execute(&self.pool)
            .await
            .map_err(infra)?;

        self.load_cart(user_id).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        self.load_cart(user_id).await
    }

    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError> {
        let Some(cart) = self.load_cart(user_id).await? else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&self.pool)
            .await
            .map_err(infra)?;

        Ok(true)
    }
}
