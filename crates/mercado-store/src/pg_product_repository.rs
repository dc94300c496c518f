//! `PostgreSQL` implementation of the `ProductRepository` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use mercado_catalog::domain::models::{CreateProduct, Product};
use mercado_catalog::domain::repository::ProductRepository;
use mercado_core::error::DomainError;

use crate::infra;

/// PostgreSQL-backed product repository.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, stock, created_at, updated_at";

impl PgProductRepository {
    /// Creates a new `PgProductRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &sqlx::postgres::PgRow) -> Product {
        Product {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            category: row.get("category"),
            stock: row.get("stock"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &CreateProduct) -> Result<Product, DomainError> {
        let row = sqlx::query(&format!(
            "INSERT INTO products (name, description, price, category, stock)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;

        Ok(Self::row_to_product(&row))
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows.iter().map(Self::row_to_product).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        Ok(row.as_ref().map(Self::row_to_product))
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DomainError> {
        // Guarded update: stock never goes negative.
        let result = sqlx::query(
            "UPDATE products
             SET stock = stock - $2, updated_at = NOW()
             WHERE id = $1 AND stock >= $2",
        )
        .bind(id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        Ok(result.rows_affected() > 0)
    }
}
