//! Cart repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use mercado_core::error::DomainError;

use super::models::{Cart, CartItem};

/// Relational access to carts.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Adds an item to the user's cart (creating the cart if needed) and
    /// returns the updated cart. Adding a product already in the cart
    /// accumulates its quantity.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn add_item(&self, user_id: Uuid, item: &CartItem) -> Result<Cart, DomainError>;

    /// Removes a product from the user's cart, returning the updated cart,
    /// or `None` when the user has no cart or the product is not in it.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn remove_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Cart>, DomainError>;

    /// The user's cart, if any.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError>;

    /// Empties the user's cart. Returns `false` when there was none.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError>;
}
