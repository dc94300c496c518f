//! Application services for the Cart context.

pub mod services;
