//! Mercado — Orders bounded context.
//!
//! Order creation is the richest event-emitting operation: it drains the
//! cart, decrements stock, and publishes to `order-created` and
//! `invoice-processing`. The invoice consumer later drives the
//! `CREATED → PROCESSING` status transition.

pub mod application;
pub mod domain;
