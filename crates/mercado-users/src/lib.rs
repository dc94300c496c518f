//! Mercado — Users bounded context.
//!
//! Registration, login, and the user lookup the welcome flow depends on.
//! Registration is an event-emitting operation: it publishes to the
//! `user-registration` and `welcome-flow` topics.

pub mod application;
pub mod domain;
