//! Mercado — Cart bounded context.
//!
//! Cart mutations are event-emitting operations: additions publish to
//! `cart-updates`, removals to `cart-removals` (which drives the
//! abandonment notice).

pub mod application;
pub mod domain;
