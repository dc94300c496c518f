//! Domain types for the Catalog context.

pub mod models;
pub mod repository;
