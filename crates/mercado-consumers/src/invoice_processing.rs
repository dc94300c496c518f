//! Invoice-processing consumer: transitions the order to `PROCESSING`,
//! renders the invoice, and chains it as a notification.

use std::sync::Arc;

use async_trait::async_trait;

use mercado_core::bus::MessageHandler;
use mercado_core::error::HandlerError;
use mercado_core::payload::{EmailNotification, EventPayload, InvoiceRequested};
use mercado_core::publisher::EventPublisher;
use mercado_orders::domain::models::{Order, OrderStatus};
use mercado_orders::domain::repository::OrderRepository;

use crate::decode_payload;

/// Consumer group for invoice processing.
pub const GROUP_ID: &str = "invoice-processing-group";

/// Source name stamped on the chained notification event.
pub const SOURCE: &str = "InvoiceService";

/// Handles `invoice-processing` messages.
pub struct InvoiceProcessingHandler {
    orders: Arc<dyn OrderRepository>,
    publisher: EventPublisher,
}

impl InvoiceProcessingHandler {
    /// Creates the handler over its collaborators.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderRepository>, publisher: EventPublisher) -> Self {
        Self { orders, publisher }
    }
}

/// Renders the invoice as an HTML table of line items plus the total.
fn render_invoice(order: &Order) -> String {
    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>${:.2}</td><td>${:.2}</td></tr>",
                item.name,
                item.quantity,
                item.price,
                item.price * f64::from(item.quantity),
            )
        })
        .collect();

    format!(
        "<h1>Factura #{}</h1>\
         <p>Fecha: {}</p>\
         <h2>Detalles del pedido</h2>\
         <table border=\"1\" cellpadding=\"5\" style=\"border-collapse: collapse;\">\
         <tr><th>Producto</th><th>Cantidad</th><th>Precio unitario</th><th>Total</th></tr>\
         {rows}\
         <tr><td colspan=\"3\" style=\"text-align: right;\"><strong>Total:</strong></td>\
         <td><strong>${:.2}</strong></td></tr>\
         </table>\
         <p>Gracias por tu compra!</p>",
        order.id,
        order.created_at.format("%d/%m/%Y"),
        order.total_amount,
    )
}

#[async_trait]
impl MessageHandler for InvoiceProcessingHandler {
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError> {
        let Some((envelope, payload)) =
            decode_payload::<InvoiceRequested>(message, "invoice-processing")
        else {
            return Ok(());
        };

        tracing::info!(event_id = %envelope.event_id, "processing invoice event");

        let Some(order) = self
            .orders
            .find_by_id(payload.order_id)
            .await
            .map_err(HandlerError::from)?
        else {
            tracing::warn!(order_id = %payload.order_id, "order not found; invoice skipped");
            return Ok(());
        };

        // Re-delivered invoices arrive for orders already past CREATED; the
        // status write is skipped but the invoice email still goes out.
        if order.status.can_transition_to(OrderStatus::Processing) {
            self.orders
                .update_status(order.id, OrderStatus::Processing)
                .await
                .map_err(HandlerError::from)?;
        } else {
            tracing::warn!(
                order_id = %order.id,
                status = %order.status,
                "order not in a state to start processing"
            );
        }

        self.publisher
            .publish(
                SOURCE,
                &EventPayload::EmailNotification(EmailNotification {
                    to: payload.user_email.clone(),
                    subject: format!("Factura #{}", order.id),
                    content: render_invoice(&order),
                }),
                Some(serde_json::json!({
                    "orderId": order.id,
                    "status": "INVOICE_SENT",
                })),
            )
            .await?;

        tracing::info!(order_id = %order.id, "invoice notification queued");
        Ok(())
    }
}
