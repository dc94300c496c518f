//! Notification consumer: the terminal hop — delivers the email.

use std::sync::Arc;

use async_trait::async_trait;

use mercado_core::bus::MessageHandler;
use mercado_core::error::HandlerError;
use mercado_core::payload::EmailNotification;
use mercado_mail::{EmailMessage, Mailer};

use crate::decode_payload;

/// Consumer group for notifications.
pub const GROUP_ID: &str = "notification-group";

/// Handles `notification-topic` messages by delivering them as email.
pub struct NotificationHandler {
    mailer: Arc<dyn Mailer>,
}

impl NotificationHandler {
    /// Creates the handler over the mail capability.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl MessageHandler for NotificationHandler {
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError> {
        let Some((envelope, payload)) =
            decode_payload::<EmailNotification>(message, "notification")
        else {
            return Ok(());
        };

        tracing::info!(event_id = %envelope.event_id, "processing notification event");

        self.mailer
            .send(&EmailMessage {
                to: payload.to.clone(),
                subject: payload.subject,
                content: payload.content,
            })
            .await
            .map_err(|e| HandlerError(e.to_string()))?;

        tracing::info!(to = %payload.to, "notification delivered");
        Ok(())
    }
}
