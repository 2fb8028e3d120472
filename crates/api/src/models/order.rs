//! Order domain types.
//!
//! An [`Order`] is a snapshot: its lines carry the unit price read at
//! placement time and the total is never recomputed from live products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{OrderId, Price, ProductId, Quantity, UserId};

/// A requested order line, as submitted by the client.
///
/// Any client-supplied price field is ignored during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A placed order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Unit price at placement time.
    pub unit_price: Price,
}

impl OrderItem {
    /// Line total (`unit_price * quantity`), `None` if it exceeds [`Price::max`].
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// A placed, immutable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Lines in the order they were requested.
    #[serde(rename = "products")]
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    pub created_at: DateTime<Utc>,
}

/// An order ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_price: Price,
}
