//! Broker connection configuration.

/// Connection settings for the Kafka cluster.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Comma-separated bootstrap broker list.
    pub brokers: String,
    /// Client id reported to the broker.
    pub client_id: String,
}

impl BusConfig {
    /// Creates a configuration for the given brokers and client id.
    #[must_use]
    pub fn new(brokers: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            client_id: client_id.into(),
        }
    }
}
