//! Message bus fakes.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use mercado_core::bus::{MessageBus, MessageHandler};
use mercado_core::error::BusError;
use mercado_core::event::Envelope;
use mercado_core::topic::Topic;

/// A bus that records every publish without delivering anywhere.
#[derive(Debug, Default)]
pub struct RecordingBus {
    sent: Mutex<Vec<(Topic, Uuid, Envelope)>>,
}

impl RecordingBus {
    /// Creates an empty recording bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every publish, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<(Topic, Uuid, Envelope)> {
        self.sent.lock().unwrap().clone()
    }

    /// Publishes sent to the given topic, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent_to(&self, topic: Topic) -> Vec<Envelope> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| *t == topic)
            .map(|(_, _, e)| e.clone())
            .collect()
    }
}

#[async_trait]
impl MessageBus for RecordingBus {
    async fn publish(&self, topic: Topic, key: Uuid, envelope: &Envelope) -> Result<(), BusError> {
        self.sent.lock().unwrap().push((topic, key, envelope.clone()));
        Ok(())
    }
}

/// A bus whose transport always rejects the send.
#[derive(Debug, Default)]
pub struct FailingBus;

#[async_trait]
impl MessageBus for FailingBus {
    async fn publish(
        &self,
        _topic: Topic,
        _key: Uuid,
        _envelope: &Envelope,
    ) -> Result<(), BusError> {
        Err(BusError::Publish("broker unreachable".into()))
    }
}

struct GroupSubscriber {
    group_id: String,
    handler: Arc<dyn MessageHandler>,
}

/// An in-process broker: every published envelope is delivered,
/// synchronously and in order, to each subscribed consumer group.
///
/// Mirrors the broker's fan-out contract — one copy per group, handler
/// failures confined to their own group — so pipeline properties can be
/// tested without Kafka.
#[derive(Default)]
pub struct InMemoryBus {
    subscribers: Mutex<HashMap<Topic, Vec<GroupSubscriber>>>,
}

impl InMemoryBus {
    /// Creates a bus with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a handler to `topic` under the named consumer group.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn subscribe(&self, group_id: &str, topic: Topic, handler: Arc<dyn MessageHandler>) {
        self.subscribers
            .lock()
            .unwrap()
            .entry(topic)
            .or_default()
            .push(GroupSubscriber {
                group_id: group_id.to_owned(),
                handler,
            });
    }

    /// Delivers raw message bytes to every group subscribed to `topic`,
    /// exactly as a broker re-delivery would.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub async fn deliver(&self, topic: Topic, message: &[u8]) {
        let handlers: Vec<(String, Arc<dyn MessageHandler>)> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers
                .get(&topic)
                .map(|groups| {
                    groups
                        .iter()
                        .map(|g| (g.group_id.clone(), Arc::clone(&g.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        for (group_id, handler) in handlers {
            if let Err(e) = handler.handle(message).await {
                tracing::warn!(group_id, error = %e, "handler failed; message dropped");
            }
        }
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, topic: Topic, _key: Uuid, envelope: &Envelope) -> Result<(), BusError> {
        let bytes =
            serde_json::to_vec(envelope).map_err(|e| BusError::Publish(e.to_string()))?;
        self.deliver(topic, &bytes).await;
        Ok(())
    }
}
