//! PostgreSQL implementations of the relational repositories.

pub mod pg_cart_repository;
pub mod pg_order_repository;
pub mod pg_product_repository;
pub mod pg_user_repository;

pub use pg_cart_repository::PgCartRepository;
pub use pg_order_repository::PgOrderRepository;
pub use pg_product_repository::PgProductRepository;
pub use pg_user_repository::PgUserRepository;

use mercado_core::error::DomainError;

pub(crate) fn infra(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}
