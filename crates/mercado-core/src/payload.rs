//! Typed event payloads, one shape per topic.
//!
//! [`EventPayload`] is the publisher-side sum of every payload the system
//! emits; the variant fixes the topic, so a payload can never travel on the
//! wrong channel. Consumers deserialize the concrete struct for their topic
//! straight from the envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topic::Topic;

/// Payload for `user-registration`: a user completed registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    /// The new user's identifier.
    pub user_id: Uuid,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
}

/// Payload for `welcome-flow`: a welcome email should be prepared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeRequested {
    /// First name, used in the greeting.
    pub name: String,
    /// Email address to look the user up by and deliver to.
    pub email: String,
}

/// Payload for `notification-topic`: an email ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotification {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub content: String,
}

/// Payload for `cart-updates`: a cart gained or changed an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdated {
    /// Owner of the cart.
    pub user_id: Uuid,
    /// The product added or changed.
    pub product_id: Uuid,
    /// Quantity after the update.
    pub quantity: i32,
}

/// Payload for `cart-removals`: an item left a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRemoved {
    /// Owner of the cart.
    pub user_id: Uuid,
    /// The removed product.
    pub product_id: Uuid,
    /// Owner's email, for the abandonment notice.
    pub user_email: String,
    /// Product display name, for the abandonment notice.
    pub product_name: String,
}

/// Payload for `order-created`: an order exists in `CREATED` state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    /// The new order.
    pub order_id: Uuid,
    /// The ordering user.
    pub user_id: Uuid,
    /// Order total.
    pub total_amount: f64,
}

/// Payload for `invoice-processing`: an invoice should be generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequested {
    /// The order to invoice.
    pub order_id: Uuid,
    /// Address the invoice is mailed to.
    pub user_email: String,
}

/// A domain event payload, tagged by the topic it belongs to.
///
/// Serializes untagged: the wire payload is the plain object, exactly as
/// consumers expect it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    /// See [`UserRegistered`].
    UserRegistered(UserRegistered),
    /// See [`WelcomeRequested`].
    WelcomeRequested(WelcomeRequested),
    /// See [`EmailNotification`].
    EmailNotification(EmailNotification),
    /// See [`CartUpdated`].
    CartUpdated(CartUpdated),
    /// See [`CartItemRemoved`].
    CartItemRemoved(CartItemRemoved),
    /// See [`OrderCreated`].
    OrderCreated(OrderCreated),
    /// See [`InvoiceRequested`].
    InvoiceRequested(InvoiceRequested),
}

impl EventPayload {
    /// The topic this payload travels on.
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            EventPayload::UserRegistered(_) => Topic::UserRegistration,
            EventPayload::WelcomeRequested(_) => Topic::WelcomeFlow,
            EventPayload::EmailNotification(_) => Topic::Notification,
            EventPayload::CartUpdated(_) => Topic::CartUpdates,
            EventPayload::CartItemRemoved(_) => Topic::CartRemovals,
            EventPayload::OrderCreated(_) => Topic::OrderCreated,
            EventPayload::InvoiceRequested(_) => Topic::InvoiceProcessing,
        }
    }
}
