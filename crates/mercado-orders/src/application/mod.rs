//! Application services for the Orders context.

pub mod services;
