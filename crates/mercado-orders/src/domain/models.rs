//! Order model types and the status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an order.
///
/// `Created → Processing → {Completed, Cancelled}`. Only the first
/// transition is driven by the event pipeline (invoice processing); the
/// rest are external.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Just placed.
    #[serde(rename = "CREATED")]
    Created,
    /// Invoice issued, fulfilment underway.
    #[serde(rename = "PROCESSING")]
    Processing,
    /// Delivered and settled.
    #[serde(rename = "COMPLETED")]
    Completed,
    /// Cancelled before completion.
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    /// The stored/string form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the status machine allows moving to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Created, OrderStatus::Processing)
                | (
                    OrderStatus::Processing,
                    OrderStatus::Completed | OrderStatus::Cancelled
                )
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OrderStatus::Created),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// One line of an order, captured from the cart at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The product.
    pub product_id: Uuid,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price at checkout.
    pub price: f64,
    /// Product display name.
    pub name: String,
}

/// An order with derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub id: Uuid,
    /// Ordering user.
    pub user_id: Uuid,
    /// The ordered lines.
    pub items: Vec<OrderItem>,
    /// Sum of quantities.
    pub total_items: i32,
    /// Sum of `price * quantity` over the lines.
    pub total_amount: f64,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Order creation input. The items come from the user's cart, not the
/// request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    /// The ordering user.
    pub user_id: Uuid,
    /// Address the invoice is mailed to.
    pub user_email: String,
}
