//! Kafka client: one shared producer, consumer-group creation.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tokio::sync::OnceCell;
use uuid::Uuid;

use mercado_core::bus::MessageBus;
use mercado_core::error::BusError;
use mercado_core::event::Envelope;
use mercado_core::topic::Topic;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka message bus client.
///
/// Owns the one shared producer for the process. The producer is created
/// lazily on first use; repeated initialization returns the existing
/// handle. Consumers are created per group and owned by their
/// subscriptions.
pub struct KafkaBus {
    config: crate::config::BusConfig,
    producer: OnceCell<FutureProducer>,
}

impl KafkaBus {
    /// Creates a client for the configured cluster. No connection is
    /// established until the producer is first used.
    #[must_use]
    pub fn new(config: crate::config::BusConfig) -> Self {
        Self {
            config,
            producer: OnceCell::new(),
        }
    }

    /// The shared producer, created on first call.
    ///
    /// # Errors
    ///
    /// `BusError::Connection` when the producer cannot be constructed.
    pub async fn producer(&self) -> Result<&FutureProducer, BusError> {
        self.producer
            .get_or_try_init(|| async {
                let producer: FutureProducer = ClientConfig::new()
                    .set("bootstrap.servers", &self.config.brokers)
                    .set("client.id", &self.config.client_id)
                    .create()
                    .map_err(|e| BusError::Connection(e.to_string()))?;
                tracing::info!(brokers = %self.config.brokers, "Kafka producer connected");
                Ok(producer)
            })
            .await
    }

    /// Opens a new consumer bound to the named group, reading from the
    /// earliest retained offset so a fresh group replays the full topic.
    ///
    /// # Errors
    ///
    /// `BusError::Subscribe` when the consumer cannot be constructed.
    pub fn create_consumer(&self, group_id: &str) -> Result<StreamConsumer, BusError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .set("client.id", &self.config.client_id)
            .set("group.id", group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .create()
            .map_err(|e| BusError::Subscribe(e.to_string()))?;

        tracing::info!(group_id, "Kafka consumer connected");
        Ok(consumer)
    }

    /// Sends raw bytes to a topic; used by the dead-letter path.
    ///
    /// # Errors
    ///
    /// `BusError::Publish` when the transport rejects or times out the send.
    pub async fn send_raw(
        &self,
        topic: Topic,
        key: Option<&[u8]>,
        payload: &[u8],
    ) -> Result<(), BusError> {
        let producer = self.producer().await?;

        let mut record = FutureRecord::to(topic.as_str()).payload(payload);
        if let Some(key) = key {
            record = record.key(key);
        }

        producer
            .send(record, SEND_TIMEOUT)
            .await
            .map_err(|(e, _)| BusError::Publish(e.to_string()))?;
        Ok(())
    }

    /// Gracefully closes the shared producer, flushing in-flight sends.
    /// Consumers are not tracked here and are closed by their owners.
    pub async fn disconnect(&self) {
        if let Some(producer) = self.producer.get() {
            if let Err(e) = producer.flush(SEND_TIMEOUT) {
                tracing::warn!(error = %e, "Kafka producer flush failed during disconnect");
            }
            tracing::info!("Kafka producer disconnected");
        }
    }

    /// Subscribes the consumer to the topic's partitions.
    ///
    /// # Errors
    ///
    /// `BusError::Subscribe` when the broker rejects the subscription.
    pub(crate) fn assign_topic(
        consumer: &StreamConsumer,
        topic: Topic,
    ) -> Result<(), BusError> {
        consumer
            .subscribe(&[topic.as_str()])
            .map_err(|e| BusError::Subscribe(e.to_string()))
    }
}

#[async_trait]
impl MessageBus for KafkaBus {
    async fn publish(&self, topic: Topic, key: Uuid, envelope: &Envelope) -> Result<(), BusError> {
        let producer = self.producer().await?;

        let bytes = serde_json::to_vec(envelope).map_err(|e| BusError::Publish(e.to_string()))?;
        let key = key.to_string();

        let record = FutureRecord::to(topic.as_str()).key(&key).payload(&bytes);

        producer
            .send(record, SEND_TIMEOUT)
            .await
            .map_err(|(e, _)| BusError::Publish(e.to_string()))?;

        tracing::debug!(topic = %topic, key, "message published");
        Ok(())
    }
}
