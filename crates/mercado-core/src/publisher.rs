//! The event publisher: the only sanctioned entry point for emitting a
//! domain event.
//!
//! Store-then-publish, never the reverse: an event reaches the bus only
//! after it is durably recorded. A crash between the two steps leaves a
//! stored-but-unbroadcast event for the outbox sweep to pick up.

use std::sync::Arc;

use uuid::Uuid;

use crate::bus::MessageBus;
use crate::clock::Clock;
use crate::error::PublishError;
use crate::event::{Envelope, EventRecord};
use crate::payload::EventPayload;
use crate::store::EventStore;

/// Composes the event store and the message bus behind one `publish` call.
///
/// Constructed once at startup with its live handles and threaded through
/// every component that emits events.
#[derive(Clone)]
pub struct EventPublisher {
    store: Arc<dyn EventStore>,
    bus: Arc<dyn MessageBus>,
    clock: Arc<dyn Clock>,
}

impl EventPublisher {
    /// Creates a new publisher over the given store, bus, and clock.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, bus: Arc<dyn MessageBus>, clock: Arc<dyn Clock>) -> Self {
        Self { store, bus, clock }
    }

    /// Persists and broadcasts one domain event, returning its id.
    ///
    /// The topic is fixed by the payload variant. The snapshot defaults to
    /// an empty object and never leaves the store.
    ///
    /// On success the event is durably stored and handed to the broker;
    /// no consumer is guaranteed to have processed it.
    ///
    /// # Errors
    ///
    /// `Store` errors abort before any bus traffic. `Bus` errors leave the
    /// event stored with its outbox marker unset.
    pub async fn publish(
        &self,
        source: &str,
        payload: &EventPayload,
        snapshot: Option<serde_json::Value>,
    ) -> Result<Uuid, PublishError> {
        let topic = payload.topic();
        let event_id = Uuid::new_v4();
        let occurred_at = self.clock.now();

        let payload_value = serde_json::to_value(payload)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let record = EventRecord {
            event_id,
            occurred_at,
            source: source.to_owned(),
            topic,
            payload: payload_value.clone(),
            snapshot: snapshot.unwrap_or_else(|| serde_json::json!({})),
            published: false,
        };
        self.store.save(&record).await?;

        let envelope = Envelope {
            event_id,
            timestamp: occurred_at,
            source: source.to_owned(),
            payload: payload_value,
        };
        self.bus.publish(topic, event_id, &envelope).await?;

        // The event is already on the bus; a failed marker update only means
        // the sweep may re-send it, which at-least-once delivery tolerates.
        if let Err(e) = self.store.mark_published(event_id).await {
            tracing::warn!(event_id = %event_id, error = %e, "outbox marker update failed");
        }

        tracing::info!(topic = %topic, event_id = %event_id, source, "event published");
        Ok(event_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::error::{BusError, EventStoreError};
    use crate::payload::OrderCreated;
    use crate::topic::Topic;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct FakeStore {
        saved: Mutex<Vec<EventRecord>>,
        marked: Mutex<Vec<Uuid>>,
        fail_save: bool,
    }

    #[async_trait::async_trait]
    impl EventStore for FakeStore {
        async fn save(&self, record: &EventRecord) -> Result<(), EventStoreError> {
            if self.fail_save {
                return Err(EventStoreError::Unavailable("connection refused".into()));
            }
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn mark_published(&self, event_id: Uuid) -> Result<(), EventStoreError> {
            self.marked.lock().unwrap().push(event_id);
            Ok(())
        }

        async fn find_unpublished(
            &self,
            _cutoff: DateTime<Utc>,
            _limit: i64,
        ) -> Result<Vec<EventRecord>, EventStoreError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !self.marked.lock().unwrap().contains(&r.event_id))
                .cloned()
                .collect())
        }

        async fn find_by_source(&self, _source: &str) -> Result<Vec<EventRecord>, EventStoreError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn find_by_topic(&self, _topic: Topic) -> Result<Vec<EventRecord>, EventStoreError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn find_all(&self) -> Result<Vec<EventRecord>, EventStoreError> {
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct FakeBus {
        sent: Mutex<Vec<(Topic, Uuid, Envelope)>>,
        fail_publish: bool,
    }

    #[async_trait::async_trait]
    impl MessageBus for FakeBus {
        async fn publish(
            &self,
            topic: Topic,
            key: Uuid,
            envelope: &Envelope,
        ) -> Result<(), BusError> {
            if self.fail_publish {
                return Err(BusError::Publish("broker unreachable".into()));
            }
            self.sent.lock().unwrap().push((topic, key, envelope.clone()));
            Ok(())
        }
    }

    fn order_payload() -> EventPayload {
        EventPayload::OrderCreated(OrderCreated {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_amount: 100.0,
        })
    }

    fn publisher(store: Arc<FakeStore>, bus: Arc<FakeBus>) -> EventPublisher {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        EventPublisher::new(store, bus, clock)
    }

    #[tokio::test]
    async fn test_publish_stores_then_sends_keyed_by_event_id() {
        // Arrange
        let store = Arc::new(FakeStore::default());
        let bus = Arc::new(FakeBus::default());
        let publisher = publisher(store.clone(), bus.clone());

        // Act
        let event_id = publisher
            .publish(
                "OrderService",
                &order_payload(),
                Some(serde_json::json!({"status": "CREATED", "items": 1})),
            )
            .await
            .unwrap();

        // Assert
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].event_id, event_id);
        assert_eq!(saved[0].topic, Topic::OrderCreated);
        assert_eq!(saved[0].source, "OrderService");
        assert_eq!(saved[0].snapshot["status"], "CREATED");

        let sent = bus.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (topic, key, envelope) = &sent[0];
        assert_eq!(*topic, Topic::OrderCreated);
        assert_eq!(*key, event_id);
        assert_eq!(envelope.event_id, event_id);
        assert_eq!(envelope.payload, saved[0].payload);

        assert_eq!(store.marked.lock().unwrap().as_slice(), &[event_id]);
    }

    #[tokio::test]
    async fn test_publish_defaults_snapshot_to_empty_object() {
        // Arrange
        let store = Arc::new(FakeStore::default());
        let bus = Arc::new(FakeBus::default());
        let publisher = publisher(store.clone(), bus.clone());

        // Act
        publisher
            .publish("OrderService", &order_payload(), None)
            .await
            .unwrap();

        // Assert
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved[0].snapshot, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_before_any_bus_traffic() {
        // Arrange
        let store = Arc::new(FakeStore {
            fail_save: true,
            ..FakeStore::default()
        });
        let bus = Arc::new(FakeBus::default());
        let publisher = publisher(store, bus.clone());

        // Act
        let result = publisher.publish("OrderService", &order_payload(), None).await;

        // Assert
        assert!(matches!(
            result,
            Err(PublishError::Store(EventStoreError::Unavailable(_)))
        ));
        assert!(bus.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bus_failure_leaves_event_stored_and_unmarked() {
        // Arrange
        let store = Arc::new(FakeStore::default());
        let bus = Arc::new(FakeBus {
            fail_publish: true,
            ..FakeBus::default()
        });
        let publisher = publisher(store.clone(), bus);

        // Act
        let result = publisher.publish("OrderService", &order_payload(), None).await;

        // Assert
        assert!(matches!(result, Err(PublishError::Bus(BusError::Publish(_)))));
        assert_eq!(store.saved.lock().unwrap().len(), 1);
        assert!(store.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timestamp_comes_from_the_injected_clock() {
        // Arrange
        let store = Arc::new(FakeStore::default());
        let bus = Arc::new(FakeBus::default());
        let publisher = publisher(store.clone(), bus);
        let fixed_now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        // Act
        publisher
            .publish("CartService", &order_payload(), None)
            .await
            .unwrap();

        // Assert
        assert_eq!(store.saved.lock().unwrap()[0].occurred_at, fixed_now);
    }
}
