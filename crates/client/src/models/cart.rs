//! Cart and checkout.
//!
//! The server owns the cart. Every cart mutation answers with the whole cart,
//! and the client replaces its copy with it instead of patching locally.

use serde::{Deserialize, Serialize};
use shopvely_core::{CartId, CartItemId, OrderId, Price, ProductId};

/// The current user's cart, `GET /cart/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_price: Price,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line with the given id.
    #[must_use]
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Line holding the given product.
    #[must_use]
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    /// The cart as it looks right after a successful checkout: same id, no
    /// lines, zero totals.
    #[must_use]
    pub fn emptied(&self) -> Self {
        Self {
            id: self.id,
            ..Self::default()
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: CartProduct,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity. `None` if the server sent a price too
    /// large to multiply.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.price.times(self.quantity)
    }
}

/// The product snapshot embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Cart plus the line count shown on the navigation badge.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub cart: Cart,
    /// Number of distinct lines, not units.
    pub count: usize,
}

impl From<Cart> for CartSummary {
    fn from(cart: Cart) -> Self {
        Self {
            count: cart.items.len(),
            cart,
        }
    }
}

/// `POST /cart/checkout/` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    #[serde(default)]
    pub detail: Option<String>,
}

impl CheckoutReceipt {
    /// Confirmation shown after checkout.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!("Order #{} placed successfully!", self.order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CART: &str = r#"{
        "id": 2,
        "items": [
            {"id": 11, "product": {"id": 3, "title": "Cotton Kurta", "price": "1299.00", "image": ""}, "quantity": 2},
            {"id": 12, "product": {"id": 5, "title": "Brass Diya", "price": "150.50"}, "quantity": 1}
        ],
        "total_items": 3,
        "total_price": "2748.50"
    }"#;

    #[test]
    fn test_deserialize_cart() {
        let cart: Cart = serde_json::from_str(CART).unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total_price, Price::from_paise(274_850));
        assert_eq!(
            cart.item(CartItemId::new(11)).unwrap().line_total(),
            Some(Price::from_paise(259_800))
        );
        assert!(cart.item_for_product(ProductId::new(5)).is_some());
    }

    #[test]
    fn test_numeric_zero_total() {
        let cart: Cart =
            serde_json::from_str(r#"{"items": [], "total_items": 0, "total_price": 0}"#).unwrap();
        assert!(cart.is_empty());
        assert!(cart.total_price.is_zero());
    }

    #[test]
    fn test_emptied_keeps_id() {
        let cart: Cart = serde_json::from_str(CART).unwrap();
        let emptied = cart.emptied();
        assert_eq!(emptied.id, Some(CartId::new(2)));
        assert!(emptied.is_empty());
        assert_eq!(emptied.total_items, 0);
        assert_eq!(emptied.total_price, Price::ZERO);
    }

    #[test]
    fn test_summary_counts_lines() {
        let cart: Cart = serde_json::from_str(CART).unwrap();
        assert_eq!(CartSummary::from(cart).count, 2);
    }

    #[test]
    fn test_checkout_confirmation() {
        let receipt: CheckoutReceipt =
            serde_json::from_str(r#"{"detail": "Order created", "order_id": 42}"#).unwrap();
        assert_eq!(receipt.confirmation(), "Order #42 placed successfully!");
    }
}
