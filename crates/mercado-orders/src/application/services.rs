//! Order services.

use uuid::Uuid;

use mercado_cart::domain::repository::CartRepository;
use mercado_catalog::domain::repository::ProductRepository;
use mercado_core::error::DomainError;
use mercado_core::payload::{EventPayload, InvoiceRequested, OrderCreated};
use mercado_core::publisher::EventPublisher;

use crate::domain::models::{CreateOrder, Order, OrderItem};
use crate::domain::repository::OrderRepository;

/// Source name stamped on events emitted by this context.
pub const SOURCE: &str = "OrderService";

/// Creates an order from the user's cart, then publishes the
/// `order-created` and `invoice-processing` events.
///
/// A failed publish fails the whole operation so the caller can roll back.
///
/// # Errors
///
/// `Validation` when the cart is missing or empty; `Infrastructure` on
/// storage failure; `Publish` when an event cannot be emitted.
pub async fn create_order(
    input: CreateOrder,
    orders: &dyn OrderRepository,
    carts: &dyn CartRepository,
    products: &dyn ProductRepository,
    publisher: &EventPublisher,
) -> Result<Order, DomainError> {
    let cart = carts
        .find_by_user(input.user_id)
        .await?
        .filter(|c| !c.items.is_empty())
        .ok_or_else(|| DomainError::Validation("cart is empty".into()))?;

    let items: Vec<OrderItem> = cart
        .items
        .iter()
        .map(|i| OrderItem {
            product_id: i.product_id,
            quantity: i.quantity,
            price: i.price,
            name: i.name.clone(),
        })
        .collect();

    let order = orders.create(input.user_id, &items).await?;

    for item in &order.items {
        if !products.decrement_stock(item.product_id, item.quantity).await? {
            tracing::warn!(product_id = %item.product_id, "stock went short after checkout");
        }
    }

    carts.clear(input.user_id).await?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::OrderCreated(OrderCreated {
                order_id: order.id,
                user_id: order.user_id,
                total_amount: order.total_amount,
            }),
            Some(serde_json::json!({
                "status": order.status.as_str(),
                "items": order.items.len(),
            })),
        )
        .await?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::InvoiceRequested(InvoiceRequested {
                order_id: order.id,
                user_email: input.user_email.clone(),
            }),
            None,
        )
        .await?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, "order created");
    Ok(order)
}

/// Looks an order up by id.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn get_order(
    id: Uuid,
    orders: &dyn OrderRepository,
) -> Result<Option<Order>, DomainError> {
    orders.find_by_id(id).await
}

/// The user's orders, most recent first.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn get_user_orders(
    user_id: Uuid,
    orders: &dyn OrderRepository,
) -> Result<Vec<Order>, DomainError> {
    orders.find_by_user(user_id).await
}
