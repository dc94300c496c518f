//! Shared application state.
//!
//! Every live handle — pool-backed repositories, the event store, the
//! publisher — is constructed once at startup and threaded through here.
//! No component owns process-global mutable state.

use std::sync::Arc;

use mercado_cart::domain::repository::CartRepository;
use mercado_catalog::domain::repository::ProductRepository;
use mercado_core::publisher::EventPublisher;
use mercado_core::store::EventStore;
use mercado_orders::domain::repository::OrderRepository;
use mercado_users::domain::password::PasswordHasher;
use mercado_users::domain::repository::UserRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The write-path entry point for domain events.
    pub publisher: EventPublisher,
    /// Read access to the event log.
    pub event_store: Arc<dyn EventStore>,
    /// Users repository.
    pub users: Arc<dyn UserRepository>,
    /// Products repository.
    pub products: Arc<dyn ProductRepository>,
    /// Carts repository.
    pub carts: Arc<dyn CartRepository>,
    /// Orders repository.
    pub orders: Arc<dyn OrderRepository>,
    /// Password hashing capability.
    pub hasher: Arc<dyn PasswordHasher>,
}
