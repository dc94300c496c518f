//! The subscribe run loop and its failure policy.
//!
//! One message at a time per partition; the offset advances whatever the
//! handler's outcome. What happens to a failed message is the
//! subscription's [`FailurePolicy`]; the default is to log and drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use rdkafka::Message;
use rdkafka::consumer::StreamConsumer;

use mercado_core::bus::MessageHandler;
use mercado_core::error::BusError;
use mercado_core::topic::Topic;

use crate::kafka::KafkaBus;

/// What the run loop does with a message whose handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the error and move on; the message's side effect is lost.
    #[default]
    Drop,
    /// Re-invoke the handler up to `attempts` more times, then drop.
    Retry {
        /// Additional invocations after the first failure.
        attempts: u32,
    },
    /// Forward the raw message to the named topic, then move on.
    DeadLetter {
        /// Destination topic for failed messages.
        topic: Topic,
    },
}

/// Outcome of running one message through a handler under a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The handler succeeded.
    Handled,
    /// The handler failed and the message was dropped.
    Dropped,
    /// The handler failed and the message goes to the given topic.
    DeadLetter(Topic),
}

/// Runs one message through the handler, resolving failures per the policy.
pub async fn apply_policy(
    handler: &dyn MessageHandler,
    policy: FailurePolicy,
    message: &[u8],
) -> Disposition {
    let retries = match policy {
        FailurePolicy::Retry { attempts } => attempts,
        FailurePolicy::Drop | FailurePolicy::DeadLetter { .. } => 0,
    };

    let mut attempt = 0;
    loop {
        match handler.handle(message).await {
            Ok(()) => return Disposition::Handled,
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::warn!(attempt, error = %e, "handler failed; retrying");
            }
            Err(e) => {
                return match policy {
                    FailurePolicy::DeadLetter { topic } => {
                        tracing::warn!(error = %e, dead_letter = %topic, "handler failed; dead-lettering");
                        Disposition::DeadLetter(topic)
                    }
                    FailurePolicy::Drop | FailurePolicy::Retry { .. } => {
                        tracing::error!(error = %e, "handler failed; message dropped");
                        Disposition::Dropped
                    }
                };
            }
        }
    }
}

/// Handle to a running subscription.
pub struct Subscription {
    topic: Topic,
    group_id: String,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// The subscribed topic.
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Whether the run loop is still consuming.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stops the run loop after the in-flight message.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        tracing::info!(topic = %self.topic, group_id = %self.group_id, "subscription stopped");
    }
}

/// Subscribes `consumer` to `topic` and spawns its run loop.
///
/// The loop invokes the handler for each received message, sequentially per
/// partition. Handler errors never escape the loop: they are resolved by
/// `policy` and the offset advances regardless.
///
/// # Errors
///
/// `BusError::Subscribe` when the broker rejects the subscription.
pub fn subscribe(
    bus: &Arc<KafkaBus>,
    consumer: StreamConsumer,
    group_id: &str,
    topic: Topic,
    policy: FailurePolicy,
    handler: Arc<dyn MessageHandler>,
) -> Result<Subscription, BusError> {
    KafkaBus::assign_topic(&consumer, topic)?;

    let active = Arc::new(AtomicBool::new(true));
    let subscription = Subscription {
        topic,
        group_id: group_id.to_owned(),
        active: Arc::clone(&active),
    };

    let bus = Arc::clone(bus);
    tokio::spawn(async move {
        run_loop(&bus, &consumer, topic, policy, handler.as_ref(), &active).await;
    });

    tracing::info!(topic = %topic, group_id, "subscribed");
    Ok(subscription)
}

async fn run_loop(
    bus: &KafkaBus,
    consumer: &StreamConsumer,
    topic: Topic,
    policy: FailurePolicy,
    handler: &dyn MessageHandler,
    active: &AtomicBool,
) {
    let mut stream = consumer.stream();

    while active.load(Ordering::SeqCst) {
        match stream.next().await {
            Some(Ok(message)) => {
                let payload = message.payload().unwrap_or_default();
                let disposition = apply_policy(handler, policy, payload).await;

                if let Disposition::DeadLetter(dead_topic) = disposition
                    && let Err(e) = bus.send_raw(dead_topic, message.key(), payload).await
                {
                    tracing::error!(error = %e, topic = %topic, "dead-letter forward failed");
                }
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, topic = %topic, "consumer error");
            }
            None => {
                tracing::debug!(topic = %topic, "consumer stream ended");
                break;
            }
        }
    }
}
