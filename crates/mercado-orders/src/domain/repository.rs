//! Order repository abstraction.
//!
//! `find_by_id` and `update_status` are also the collaborator contract the
//! invoice-processing consumer depends on.

use async_trait::async_trait;
use uuid::Uuid;

use mercado_core::error::DomainError;

use super::models::{Order, OrderItem, OrderStatus};

/// Relational access to orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Creates an order in `Created` state with the given lines, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn create(&self, user_id: Uuid, items: &[OrderItem]) -> Result<Order, DomainError>;

    /// Looks an order up by id, items included.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// The user's orders, most recent first.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// Moves an order to `status`. Returns `false` when the order is
    /// unknown.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError>;
}
