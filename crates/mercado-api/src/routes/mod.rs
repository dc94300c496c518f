//! HTTP routes, one module per resource.

pub mod cart;
pub mod events;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
