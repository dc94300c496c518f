//! Application services for the Catalog context.

pub mod services;
