//! The event consumers.
//!
//! Four independent consumer groups, one per topic, each a
//! `(group, topic, handler)` triple registered at startup. Handlers decode
//! the wire envelope, perform their side effect, and may chain a derived
//! event through the publisher — that chaining is how every kind of event
//! ends up as an email without coupling producers to the mail system.

use std::sync::Arc;

use mercado_bus::{FailurePolicy, KafkaBus, Subscription, subscribe};
use mercado_core::bus::MessageHandler;
use mercado_core::error::BusError;
use mercado_core::event::Envelope;
use mercado_core::publisher::EventPublisher;
use mercado_core::topic::Topic;
use mercado_mail::Mailer;
use mercado_orders::domain::repository::OrderRepository;
use mercado_users::domain::repository::UserRepository;

pub mod cart_removal;
pub mod invoice_processing;
pub mod notification;
pub mod welcome_flow;

pub use cart_removal::CartRemovalHandler;
pub use invoice_processing::InvoiceProcessingHandler;
pub use notification::NotificationHandler;
pub use welcome_flow::WelcomeFlowHandler;

/// Decodes the envelope and its typed payload, or logs and yields `None` —
/// the message is dropped without disturbing the run loop.
pub(crate) fn decode_payload<T: serde::de::DeserializeOwned>(
    message: &[u8],
    consumer: &str,
) -> Option<(Envelope, T)> {
    let envelope = match Envelope::decode(message) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(consumer, error = %e, "malformed envelope; message skipped");
            return None;
        }
    };
    match envelope.payload_as::<T>() {
        Ok(payload) => Some((envelope, payload)),
        Err(e) => {
            tracing::warn!(
                consumer,
                event_id = %envelope.event_id,
                error = %e,
                "unexpected payload shape; message skipped"
            );
            None
        }
    }
}

/// Starts all four consumers against the given bus.
///
/// Each gets its own consumer group, so every group receives every message
/// on its topic and a failure in one never affects another. The returned
/// subscriptions are kept alive by their owner.
///
/// # Errors
///
/// `BusError` when a consumer cannot be created or subscribed.
pub fn start_consumers(
    bus: &Arc<KafkaBus>,
    publisher: &EventPublisher,
    mailer: Arc<dyn Mailer>,
    users: Arc<dyn UserRepository>,
    orders: Arc<dyn OrderRepository>,
) -> Result<Vec<Subscription>, BusError> {
    let bindings: [(&str, Topic, Arc<dyn MessageHandler>); 4] = [
        (
            welcome_flow::GROUP_ID,
            Topic::WelcomeFlow,
            Arc::new(WelcomeFlowHandler::new(users, publisher.clone())),
        ),
        (
            notification::GROUP_ID,
            Topic::Notification,
            Arc::new(NotificationHandler::new(mailer)),
        ),
        (
            cart_removal::GROUP_ID,
            Topic::CartRemovals,
            Arc::new(CartRemovalHandler::new(publisher.clone())),
        ),
        (
            invoice_processing::GROUP_ID,
            Topic::InvoiceProcessing,
            Arc::new(InvoiceProcessingHandler::new(orders, publisher.clone())),
        ),
    ];

    let mut subscriptions = Vec::with_capacity(bindings.len());
    for (group_id, topic, handler) in bindings {
        let consumer = bus.create_consumer(group_id)?;
        let subscription =
            subscribe(bus, consumer, group_id, topic, FailurePolicy::default(), handler)?;
        subscriptions.push(subscription);
    }
    Ok(subscriptions)
}
