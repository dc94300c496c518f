//! Cart-removal consumer: turns a removed item into an abandonment notice.

use async_trait::async_trait;

use mercado_core::bus::MessageHandler;
use mercado_core::error::HandlerError;
use mercado_core::payload::{CartItemRemoved, EmailNotification, EventPayload};
use mercado_core::publisher::EventPublisher;

use crate::decode_payload;

/// Consumer group for cart removals.
pub const GROUP_ID: &str = "cart-removal-group";

/// Source name stamped on the chained notification event.
pub const SOURCE: &str = "CartRemovalService";

/// Handles `cart-removals` messages by chaining an abandonment email.
pub struct CartRemovalHandler {
    publisher: EventPublisher,
}

impl CartRemovalHandler {
    /// Creates the handler over the publisher.
    #[must_use]
    pub fn new(publisher: EventPublisher) -> Self {
        Self { publisher }
    }
}

fn abandonment_email(product_name: &str) -> String {
    format!(
        "<h1>Artículo eliminado de tu carrito</h1>\
         <p>Hola,</p>\
         <p>Vimos que eliminaste \"{product_name}\" de tu carrito.</p>\
         <p>¿Necesitas ayuda para encontrar algo más? Estamos aquí para ayudarte.</p>\
         <p>Vuelve a visitar nuestra tienda para ver más productos.</p>"
    )
}

#[async_trait]
impl MessageHandler for CartRemovalHandler {
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError> {
        let Some((envelope, payload)) =
            decode_payload::<CartItemRemoved>(message, "cart-removal")
        else {
            return Ok(());
        };

        tracing::info!(event_id = %envelope.event_id, "processing cart removal event");

        self.publisher
            .publish(
                SOURCE,
                &EventPayload::EmailNotification(EmailNotification {
                    to: payload.user_email.clone(),
                    subject: "¿Olvidaste algo en tu carrito?".to_owned(),
                    content: abandonment_email(&payload.product_name),
                }),
                Some(serde_json::json!({
                    "userId": payload.user_id,
                    "productId": payload.product_id,
                    "status": "CART_REMOVAL_NOTIFICATION_SENT",
                })),
            )
            .await?;

        tracing::info!(email = %payload.user_email, "cart removal notification queued");
        Ok(())
    }
}
