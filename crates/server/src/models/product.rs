//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bagan_baskets_core::{Price, ProductId, Sku};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Catalog category; matched by exact string equality.
    pub category: Option<String>,
    /// Current price in cents.
    pub price: Price,
    /// Units on hand; never negative.
    pub stock: i32,
    /// Human-assigned product code, unique across the catalog.
    pub sku: Sku,
    /// Whether the product is shown in the public listing.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Price,
    pub stock: i32,
    pub sku: Sku,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Partial update for a product. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
