//! Orders and invoices. Read-only to the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopvely_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order with its shipping snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<UserId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Price,
    #[serde(default)]
    pub shipping_full_name: String,
    #[serde(default)]
    pub shipping_phone: String,
    #[serde(default)]
    pub shipping_line1: String,
    #[serde(default)]
    pub shipping_line2: String,
    #[serde(default)]
    pub shipping_city: String,
    #[serde(default)]
    pub shipping_state: String,
    #[serde(default)]
    pub shipping_pincode: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Status transitions, oldest first. Older servers omit it.
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Shipping address lines, skipping blanks.
    #[must_use]
    pub fn shipping_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = [
            &self.shipping_full_name,
            &self.shipping_line1,
            &self.shipping_line2,
        ]
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect();
        if !self.shipping_city.is_empty() {
            lines.push(format!(
                "{}, {} - {}",
                self.shipping_city, self.shipping_state, self.shipping_pincode
            ));
        }
        if !self.shipping_phone.is_empty() {
            lines.push(self.shipping_phone.clone());
        }
        lines
    }
}

/// One order line. `price` is the unit price at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product: ProductId,
    pub quantity: u32,
    pub price: Price,
}

impl OrderItem {
    /// Unit price times quantity, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.price.times(self.quantity)
    }
}

/// One entry of an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    #[serde(default)]
    pub old_status: Option<OrderStatus>,
    pub new_status: OrderStatus,
    pub changed_at: DateTime<Utc>,
}

/// A downloaded invoice document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub order_id: OrderId,
    /// `Content-Type` reported by the server.
    pub content_type: Option<String>,
    /// The document itself, normally HTML.
    pub body: String,
}

impl Invoice {
    /// File name to save the invoice under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("invoice-{}.html", self.order_id)
    }
}
