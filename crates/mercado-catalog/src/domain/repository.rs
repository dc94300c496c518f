//! Product repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use mercado_core::error::DomainError;

use super::models::{CreateProduct, Product};

/// Relational access to products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a new product.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn create(&self, product: &CreateProduct) -> Result<Product, DomainError>;

    /// Every product in the catalog.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Looks a product up by id.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// Removes `quantity` units from stock. Returns `false` when the
    /// product is unknown or the stock is insufficient; stock never goes
    /// negative.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DomainError>;
}
