//! Cart model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line in a cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The product.
    pub product_id: Uuid,
    /// Units of it.
    pub quantity: i32,
    /// Unit price at the time it was added.
    pub price: f64,
    /// Product display name.
    pub name: String,
}

/// A user's cart with derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Current lines.
    pub items: Vec<CartItem>,
    /// Sum of quantities.
    pub total_items: i32,
    /// Sum of `price * quantity` over the lines.
    pub total_amount: f64,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for adding an item to a cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItem {
    /// Owning user.
    pub user_id: Uuid,
    /// The product to add.
    pub product_id: Uuid,
    /// Units to add.
    pub quantity: i32,
}
