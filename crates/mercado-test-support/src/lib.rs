//! Shared test fakes for the Mercado backend.
//!
//! Fakes for the core seams (clock, event store, message bus, mailer) used
//! across crate test suites. Context repositories are small enough that
//! each crate fakes its own.

pub mod bus;
pub mod clock;
pub mod event_store;
pub mod mailer;

pub use bus::{FailingBus, InMemoryBus, RecordingBus};
pub use clock::FixedClock;
pub use event_store::{FailingEventStore, InMemoryEventStore};
pub use mailer::{FailingMailer, RecordingMailer};
