//! Mercado — Product catalog bounded context.
//!
//! Plain CRUD over products plus the stock bookkeeping carts and orders
//! rely on. Catalog mutations emit no events: products have no registered
//! topic and no consumer.

pub mod application;
pub mod domain;
