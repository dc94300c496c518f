//! Event store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EventStoreError;
use crate::event::EventRecord;
use crate::topic::Topic;

/// Durable, queryable, append-only log of every published event.
///
/// Reads return full-result lists in ascending `occurred_at` order; each
/// call re-queries the store.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts one event.
    ///
    /// # Errors
    ///
    /// `Duplicate` if the event id already exists; `Unavailable` if the
    /// backing store cannot be reached.
    async fn save(&self, record: &EventRecord) -> Result<(), EventStoreError>;

    /// Sets the outbox marker after the broker has accepted the event.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the backing store cannot be reached.
    async fn mark_published(&self, event_id: Uuid) -> Result<(), EventStoreError>;

    /// Events not yet handed to the broker, oldest first.
    ///
    /// Only events created at or before `cutoff` are returned, so the sweep
    /// never races a publish that is still in flight.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the backing store cannot be reached.
    async fn find_unpublished(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<EventRecord>, EventStoreError>;

    /// All events emitted by the named source.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the backing store cannot be reached.
    async fn find_by_source(&self, source: &str) -> Result<Vec<EventRecord>, EventStoreError>;

    /// All events on the given topic.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the backing store cannot be reached.
    async fn find_by_topic(&self, topic: Topic) -> Result<Vec<EventRecord>, EventStoreError>;

    /// Every stored event.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the backing store cannot be reached.
    async fn find_all(&self) -> Result<Vec<EventRecord>, EventStoreError>;
}
