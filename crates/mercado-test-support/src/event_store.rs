//! In-memory `EventStore` fakes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use mercado_core::error::EventStoreError;
use mercado_core::event::EventRecord;
use mercado_core::store::EventStore;
use mercado_core::topic::Topic;

/// An event store over a `Vec`, enforcing the same contract as the
/// Postgres implementation: unique event ids, reads in ascending
/// `occurred_at` order.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    records: Mutex<Vec<EventRecord>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().clone()
    }

    fn sorted(mut records: Vec<EventRecord>) -> Vec<EventRecord> {
        records.sort_by_key(|r| r.occurred_at);
        records
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(&self, record: &EventRecord) -> Result<(), EventStoreError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.event_id == record.event_id) {
            return Err(EventStoreError::Duplicate(record.event_id));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn mark_published(&self, event_id: Uuid) -> Result<(), EventStoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.event_id == event_id) {
            record.published = true;
        }
        Ok(())
    }

    async fn find_unpublished(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        let records = self.records.lock().unwrap().clone();
        let mut unpublished: Vec<EventRecord> = records
            .into_iter()
            .filter(|r| !r.published && r.occurred_at <= cutoff)
            .collect();
        unpublished.sort_by_key(|r| r.occurred_at);
        unpublished.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(unpublished)
    }

    async fn find_by_source(&self, source: &str) -> Result<Vec<EventRecord>, EventStoreError> {
        let records = self.records.lock().unwrap().clone();
        Ok(Self::sorted(records.into_iter().filter(|r| r.source == source).collect()))
    }

    async fn find_by_topic(&self, topic: Topic) -> Result<Vec<EventRecord>, EventStoreError> {
        let records = self.records.lock().unwrap().clone();
        Ok(Self::sorted(records.into_iter().filter(|r| r.topic == topic).collect()))
    }

    async fn find_all(&self) -> Result<Vec<EventRecord>, EventStoreError> {
        let records = self.records.lock().unwrap().clone();
        Ok(Self::sorted(records))
    }
}

/// An event store that always reports the backing store as unreachable.
#[derive(Debug, Default)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn save(&self, _record: &EventRecord) -> Result<(), EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn mark_published(&self, _event_id: Uuid) -> Result<(), EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn find_unpublished(
        &self,
        _cutoff: DateTime<Utc>,
        _limit: i64,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_source(&self, _source: &str) -> Result<Vec<EventRecord>, EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_topic(&self, _topic: Topic) -> Result<Vec<EventRecord>, EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn find_all(&self) -> Result<Vec<EventRecord>, EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }
}
