//! Kafka transport: shared producer, consumer groups, the subscribe run
//! loop with its failure policy, and the outbox reconciliation sweeper.

pub mod config;
pub mod consumer;
pub mod kafka;
pub mod outbox;

pub use config::BusConfig;
pub use consumer::{Disposition, FailurePolicy, Subscription, apply_policy, subscribe};
pub use kafka::KafkaBus;
pub use outbox::{OutboxSweeper, SweepConfig};
