//! Wishlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopvely_core::{Price, ProductId, WishlistId};

/// The current user's wishlist, `GET /products/wishlist/`.
///
/// Add and remove return the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: WishlistId,
    #[serde(default)]
    pub products: Vec<WishlistEntry>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wishlist {
    /// Whether `product_id` is in the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }
}

/// A saved product, identified by its product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wishlist() {
        let json = r#"{
            "id": 1,
            "products": [
                {"id": 4, "title": "Silk Dupatta", "price": "850.00", "image": "", "rating": 4.0},
                {"id": 9, "title": "Jute Bag", "price": "240.50"}
            ],
            "created_at": "2025-02-01T08:00:00Z",
            "updated_at": "2025-02-03T08:00:00Z"
        }"#;
        let wishlist: Wishlist = serde_json::from_str(json).unwrap();
        assert_eq!(wishlist.products.len(), 2);
        assert!(wishlist.contains(ProductId::new(9)));
        assert!(!wishlist.contains(ProductId::new(5)));
    }
}
