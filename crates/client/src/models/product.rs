//! Catalog product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopvely_core::{Price, ProductId};

/// A product as listed by `GET /products/` and `GET /products/:id/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image URL; empty when the product has none.
    #[serde(default)]
    pub image: String,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the current user has this product in their wishlist.
    /// Always false for anonymous requests.
    #[serde(default)]
    pub is_in_wishlist: bool,
}

impl Product {
    /// Case-insensitive title match used by the catalog search box.
    ///
    /// `needle` is expected to be lowercased and trimmed already.
    #[must_use]
    pub fn title_matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}
