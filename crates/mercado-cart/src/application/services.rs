//! Cart services.

use uuid::Uuid;

use mercado_catalog::domain::repository::ProductRepository;
use mercado_core::error::DomainError;
use mercado_core::payload::{CartItemRemoved, CartUpdated, EventPayload};
use mercado_core::publisher::EventPublisher;

use crate::domain::models::{AddCartItem, Cart, CartItem};
use crate::domain::repository::CartRepository;

/// Source name stamped on events emitted by this context.
pub const SOURCE: &str = "CartService";

/// Adds an item to the user's cart and publishes the cart-update event.
///
/// # Errors
///
/// `Validation` on a non-positive quantity or insufficient stock;
/// `NotFound` for an unknown product; `Publish` when the event cannot be
/// emitted, which fails the whole operation.
pub async fn add_to_cart(
    input: AddCartItem,
    carts: &dyn CartRepository,
    products: &dyn ProductRepository,
    publisher: &EventPublisher,
) -> Result<Cart, DomainError> {
    if input.quantity <= 0 {
        return Err(DomainError::Validation("quantity must be positive".into()));
    }

    let product = products
        .find_by_id(input.product_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("product".into()))?;

    if product.stock < input.quantity {
        return Err(DomainError::Validation(
            "not enough stock available".into(),
        ));
    }

    let cart = carts
        .add_item(
            input.user_id,
            &CartItem {
                product_id: product.id,
                quantity: input.quantity,
                price: product.price,
                name: product.name,
            },
        )
        .await?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::CartUpdated(CartUpdated {
                user_id: input.user_id,
                product_id: input.product_id,
                quantity: input.quantity,
            }),
            Some(serde_json::json!({
                "totalItems": cart.total_items,
                "totalAmount": cart.total_amount,
            })),
        )
        .await?;

    tracing::info!(user_id = %input.user_id, product_id = %input.product_id, "cart updated");
    Ok(cart)
}

/// Removes an item from the user's cart and publishes the cart-removal
/// event that drives the abandonment notice.
///
/// # Errors
///
/// `NotFound` for an unknown product or cart; `Publish` when the event
/// cannot be emitted.
pub async fn remove_from_cart(
    user_id: Uuid,
    product_id: Uuid,
    user_email: &str,
    carts: &dyn CartRepository,
    products: &dyn ProductRepository,
    publisher: &EventPublisher,
) -> Result<Cart, DomainError> {
    // The product name travels in the event for the notice copy.
    let product = products
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("product".into()))?;

    let cart = carts
        .remove_item(user_id, product_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("cart".into()))?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::CartItemRemoved(CartItemRemoved {
                user_id,
                product_id,
                user_email: user_email.to_owned(),
                product_name: product.name,
            }),
            Some(serde_json::json!({
                "totalItems": cart.total_items,
                "totalAmount": cart.total_amount,
            })),
        )
        .await?;

    tracing::info!(user_id = %user_id, product_id = %product_id, "cart item removed");
    Ok(cart)
}

/// The user's cart, if any.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn get_user_cart(
    user_id: Uuid,
    carts: &dyn CartRepository,
) -> Result<Option<Cart>, DomainError> {
    carts.find_by_user(user_id).await
}

/// Empties the user's cart.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn empty_cart(user_id: Uuid, carts: &dyn CartRepository) -> Result<bool, DomainError> {
    carts.clear(user_id).await
}
