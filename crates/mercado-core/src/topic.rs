//! The topic registry.
//!
//! Every logical channel on the message bus is a variant here; there is no
//! way to publish to, or subscribe from, a topic outside this set. The
//! string forms are the broker-visible topic names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A logical channel on the message bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// A user completed registration.
    #[serde(rename = "user-registration")]
    UserRegistration,
    /// A welcome email should be prepared for a new user.
    #[serde(rename = "welcome-flow")]
    WelcomeFlow,
    /// An email notification is ready for delivery.
    #[serde(rename = "notification-topic")]
    Notification,
    /// A cart gained or changed an item.
    #[serde(rename = "cart-updates")]
    CartUpdates,
    /// An item was removed from a cart.
    #[serde(rename = "cart-removals")]
    CartRemovals,
    /// An order was created.
    #[serde(rename = "order-created")]
    OrderCreated,
    /// An invoice should be generated for an order.
    #[serde(rename = "invoice-processing")]
    InvoiceProcessing,
}

/// All registered topics, in declaration order.
pub const ALL_TOPICS: [Topic; 7] = [
    Topic::UserRegistration,
    Topic::WelcomeFlow,
    Topic::Notification,
    Topic::CartUpdates,
    Topic::CartRemovals,
    Topic::OrderCreated,
    Topic::InvoiceProcessing,
];

impl Topic {
    /// The broker-visible topic name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::UserRegistration => "user-registration",
            Topic::WelcomeFlow => "welcome-flow",
            Topic::Notification => "notification-topic",
            Topic::CartUpdates => "cart-updates",
            Topic::CartRemovals => "cart-removals",
            Topic::OrderCreated => "order-created",
            Topic::InvoiceProcessing => "invoice-processing",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no registered topic.
#[derive(Debug, Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl std::str::FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TOPICS
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_owned()))
    }
}
