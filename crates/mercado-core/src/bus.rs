//! Message bus abstractions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{BusError, HandlerError};
use crate::event::Envelope;
use crate::topic::Topic;

/// Producer-side seam of the message bus.
///
/// Delivery is at-least-once from the broker's perspective; callers must not
/// assume exactly-once.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Sends one envelope to `topic`, keyed by `key` (the event id).
    ///
    /// # Errors
    ///
    /// `BusError::Publish` when the transport rejects or times out the send.
    async fn publish(&self, topic: Topic, key: Uuid, envelope: &Envelope) -> Result<(), BusError>;
}

/// Per-message callback of a consumer.
///
/// Implementations decode the raw envelope themselves: a message that fails
/// to decode is logged and accepted (returning `Ok`), so it is dropped
/// without disturbing the run loop. An `Err` marks a failed side effect and
/// is resolved by the subscription's failure policy.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes one raw message.
    ///
    /// # Errors
    ///
    /// `HandlerError` when the side effect failed and the failure policy
    /// should decide the message's fate.
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError>;
}
