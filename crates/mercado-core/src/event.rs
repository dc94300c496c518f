//! The event record and its wire envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topic::Topic;

/// The stored form of a domain event: the unit of record.
///
/// Immutable once saved, except for the `published` outbox marker. The
/// `snapshot` is observational audit metadata and is never sent over the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Globally unique event identifier; the store's uniqueness constraint
    /// and the bus message key.
    pub event_id: Uuid,
    /// Creation time, assigned by the publisher.
    #[serde(rename = "timestamp")]
    pub occurred_at: DateTime<Utc>,
    /// Logical name of the producing component.
    pub source: String,
    /// The channel this event belongs to.
    pub topic: Topic,
    /// Domain-specific data consumers act on.
    pub payload: serde_json::Value,
    /// Audit-only metadata captured at publish time.
    pub snapshot: serde_json::Value,
    /// Outbox marker: set once the broker has accepted the event.
    pub published: bool,
}

/// The wire form of an event, sent to the bus.
///
/// Same identity fields as the stored record, minus `snapshot` and `topic`
/// (the topic is the channel the envelope travels on).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Globally unique event identifier.
    pub event_id: Uuid,
    /// Creation time, assigned by the publisher.
    pub timestamp: DateTime<Utc>,
    /// Logical name of the producing component.
    pub source: String,
    /// Domain-specific data consumers act on.
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Decodes an envelope from raw message bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input;
    /// consumers log and skip such messages.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Deserializes the payload into its concrete per-topic type.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the payload does not
    /// match the expected shape.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

impl EventRecord {
    /// The wire envelope for this record.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope {
            event_id: self.event_id,
            timestamp: self.occurred_at,
            source: self.source.clone(),
            payload: self.payload.clone(),
        }
    }
}
