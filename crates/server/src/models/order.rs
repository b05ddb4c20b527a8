//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bagan_baskets_core::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order header.
///
/// `user_id` is immutable after creation; order visibility is gated on it
/// (see [`crate::access`]).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Order total in cents; equals the sum of item subtotals.
    pub total_amount: Price,
    /// Contact email given at checkout.
    pub customer_email: Email,
    /// Contact phone given at checkout.
    pub customer_phone: Option<String>,
    /// Shipping street address.
    pub shipping_street: String,
    /// Shipping city.
    pub shipping_city: String,
    /// Shipping country.
    pub shipping_country: String,
    /// Shipping postal code.
    pub shipping_zip: String,
    /// Free-text delivery notes.
    pub notes: Option<String>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A line item on an order.
///
/// `unit_price` is snapshotted at order time and stays fixed even when the
/// product's current price changes later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Unique line item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// The ordered product.
    pub product_id: ProductId,
    /// Units ordered; positive.
    pub quantity: i32,
    /// Per-unit price in cents at order time.
    pub unit_price: Price,
    /// `unit_price * quantity`, in cents.
    pub subtotal: Price,
}

/// Input for creating an order header. Every order starts `pending`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Price,
    pub customer_email: Email,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub shipping_street: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_zip: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for one line of a composite order creation, before the order ID
/// exists.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Input for appending a line item to an existing order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Partial update for an order. `None` means "leave unchanged".
///
/// Status changes are validated against the lifecycle transition table by
/// the order store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}
