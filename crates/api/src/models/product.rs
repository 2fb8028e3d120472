//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{CategoryId, Price, ProductId};

/// A catalog product (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Storage identity, referenced by order lines.
    pub id: ProductId,
    /// External business identifier, unique across products.
    #[serde(rename = "productId")]
    pub sku: String,
    pub title: String,
    /// Current unit price.
    pub price: Price,
    pub description: String,
    /// Advisory availability flag; orders do not check it.
    pub availability: bool,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub availability: bool,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
}
