//! Error taxonomy for the event pipeline and the domain services above it.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// An event with this id already exists.
    #[error("duplicate event: {0}")]
    Duplicate(Uuid),

    /// The backing store cannot be reached; the caller decides whether to retry.
    #[error("event store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be serialized or deserialized.
    #[error("event serialization failed: {0}")]
    Serialization(String),
}

/// Errors surfaced by the message bus transport.
#[derive(Debug, Error)]
pub enum BusError {
    /// Establishing the broker connection failed.
    #[error("bus connection failed: {0}")]
    Connection(String),

    /// Sending a message failed.
    #[error("bus publish failed: {0}")]
    Publish(String),

    /// Creating or binding a consumer failed.
    #[error("bus subscribe failed: {0}")]
    Subscribe(String),
}

/// Errors surfaced by [`crate::publisher::EventPublisher::publish`].
///
/// A `Store` error means nothing was broadcast. A `Bus` error means the
/// event is durably stored but unreachable from the bus until the outbox
/// sweep picks it up.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Persisting the event failed; no publish was attempted.
    #[error(transparent)]
    Store(#[from] EventStoreError),

    /// Handing the event to the broker failed after it was stored.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The payload could not be serialized.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

/// Top-level error type for domain service operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced entity was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// Publishing the operation's domain event failed; the whole operation
    /// fails with it.
    #[error("event publication failed: {0}")]
    Publish(#[from] PublishError),
}

/// Error returned by a consumer's per-message handler.
///
/// Handlers swallow decode failures themselves; a `HandlerError` signals a
/// failed side effect, which the run loop resolves per its failure policy.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        Self(err.to_string())
    }
}

impl From<PublishError> for HandlerError {
    fn from(err: PublishError) -> Self {
        Self(err.to_string())
    }
}
