//! Application services for the Users context.

pub mod services;
