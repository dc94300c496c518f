//! PostgreSQL-backed event store.

pub mod pg_event_store;

pub use pg_event_store::PgEventStore;
