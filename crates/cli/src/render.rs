//! Plain-text rendering of view state.

use std::fmt::Write;

use shopvely_client::FieldErrors;
use shopvely_client::models::{Address, Order, Product, WishlistEntry};
use shopvely_client::views::Notice;
use shopvely_client::views::cart::CartState;
use shopvely_core::{AddressId, Price};

/// A line total, or a placeholder when it could not be computed.
fn amount(total: Option<Price>) -> String {
    total.map_or_else(|| "n/a".to_string(), |price| price.to_string())
}

/// `session show` output. `counts` is `(cart lines, wishlist entries)`.
pub fn session(username: Option<&str>, counts: Option<(usize, usize)>) -> String {
    let mut out = username.map_or_else(
        || "Logged in".to_string(),
        |username| format!("Logged in as {username}"),
    );
    if let Some((cart, wishlist)) = counts {
        let _ = write!(out, "\nCart: {cart}  Wishlist: {wishlist}");
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice {
        Notice::Success(message) => format!("✓ {message}"),
        Notice::Alert(message) => format!("! {message}"),
    }
}

/// The panel shown instead of a list whose load failed.
pub fn error_panel(what: &str, error: &Option<String>) -> String {
    format!(
        "Could not load {what}.\n  {}",
        error.as_deref().unwrap_or("Something went wrong")
    )
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, messages) in errors.fields() {
        for message in messages {
            let _ = writeln!(out, "  {field}: {message}");
        }
    }
    if let Some(detail) = errors.detail() {
        let _ = writeln!(out, "  {detail}");
    }
    out.trim_end().to_string()
}

pub fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }
    products
        .iter()
        .map(|p| {
            let heart = if p.is_in_wishlist { " ♥" } else { "" };
            format!("#{:<5} {:<40} {:>12}{heart}", p.id, p.title, p.price.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn product(product: &Product) -> String {
    let mut out = format!("{} (#{})\n{}", product.title, product.id, product.price);
    if product.num_reviews > 0 {
        let _ = write!(
            out,
            "\nRated {:.1}/5 from {} reviews",
            product.rating, product.num_reviews
        );
    }
    if !product.description.is_empty() {
        let _ = write!(out, "\n\n{}", product.description);
    }
    out
}

pub fn cart(state: &CartState, addresses: &[Address], selected: Option<AddressId>) -> String {
    let cart = &state.data;
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for item in &cart.items {
        let _ = writeln!(
            out,
            "[{}] {:<36} {:>10} x {:<3} {:>12}",
            item.id,
            item.product.title,
            item.product.price.to_string(),
            item.quantity,
            amount(item.line_total()),
        );
    }
    let _ = writeln!(out, "Items: {}", cart.total_items);
    let _ = write!(out, "Total: {}", cart.total_price);

    if !addresses.is_empty() {
        out.push_str("\n\nDeliver to:");
        for address in addresses {
            let marker = if Some(address.id) == selected { "*" } else { " " };
            let _ = write!(out, "\n {marker} [{}] {address}", address.id);
        }
    }
    out
}

pub fn wishlist(entries: &[WishlistEntry]) -> String {
    if entries.is_empty() {
        return "Your wishlist is empty.".to_string();
    }
    entries
        .iter()
        .map(|e| format!("#{:<5} {:<40} {:>12}", e.id, e.title, e.price.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn addresses(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return "No saved addresses.".to_string();
    }
    addresses
        .iter()
        .map(|a| {
            let tag = if a.is_default { " (default)" } else { "" };
            format!("[{}] {a}{tag}\n    {}", a.id, a.phone)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn orders(orders: &[Order], filtered: bool) -> String {
    if orders.is_empty() {
        return if filtered {
            "No orders found. Try changing filters or search.".to_string()
        } else {
            "You have not placed any orders yet.".to_string()
        };
    }
    orders
        .iter()
        .map(|o| {
            format!(
                "Order #{:<6} {}  {:<10} {:>3} items  {:>12}",
                o.id,
                o.created_at.format("%d %b %Y"),
                o.status.label(),
                o.unit_count(),
                o.total_amount.to_string()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn order(order: &Order) -> String {
    let mut out = format!(
        "Order #{} placed {}\nStatus: {}\n",
        order.id,
        order.created_at.format("%d %b %Y %H:%M"),
        order.status.label()
    );

    for item in &order.items {
        let _ = write!(
            out,
            "\n  product #{:<5} {:>10} x {:<3} {:>12}",
            item.product,
            item.price.to_string(),
            item.quantity,
            amount(item.line_total())
        );
    }
    let _ = write!(out, "\n\nTotal: {}", order.total_amount);

    let shipping = order.shipping_lines();
    if !shipping.is_empty() {
        out.push_str("\n\nShipping to:");
        for line in shipping {
            let _ = write!(out, "\n  {line}");
        }
    }

    if !order.status_history.is_empty() {
        out.push_str("\n\nHistory:");
        for change in &order.status_history {
            let _ = write!(
                out,
                "\n  {}  {}",
                change.changed_at.format("%d %b %Y %H:%M"),
                change.new_status.label()
            );
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopvely_client::views::ViewState;

    use super::*;

    fn sample_order() -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "created_at": "2025-04-02T09:15:00Z",
            "status": "delivered",
            "total_amount": "200.00",
            "shipping_full_name": "Asha Rao",
            "shipping_city": "Pune",
            "shipping_state": "MH",
            "shipping_pincode": "411001",
            "items": [{"id": 1, "product": 3, "quantity": 2, "price": "100.00"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_notice() {
        assert_eq!(notice(&Notice::Success("Moved to cart".into())), "✓ Moved to cart");
        assert_eq!(notice(&Notice::Alert("Failed".into())), "! Failed");
    }

    #[test]
    fn test_session_with_counts() {
        assert_eq!(
            session(Some("asha"), Some((2, 1))),
            "Logged in as asha\nCart: 2  Wishlist: 1"
        );
        assert_eq!(session(None, None), "Logged in");
    }

    #[test]
    fn test_error_panel() {
        let panel = error_panel("orders", &Some("Service Unavailable".to_string()));
        assert!(panel.starts_with("Could not load orders."));
        assert!(panel.contains("Service Unavailable"));
    }

    #[test]
    fn test_empty_orders_message_depends_on_filters() {
        assert!(orders(&[], true).contains("Try changing filters"));
        assert!(orders(&[], false).contains("not placed any orders"));
    }

    #[test]
    fn test_order_detail() {
        let text = order(&sample_order());
        assert!(text.starts_with("Order #42 placed 02 Apr 2025"));
        assert!(text.contains("Status: Delivered"));
        assert!(text.contains("Total: ₹200.00"));
        assert!(text.contains("Pune, MH - 411001"));
    }

    #[test]
    fn test_cart_marks_selected_address() {
        let state: CartState = ViewState {
            data: serde_json::from_value(serde_json::json!({
                "items": [{"id": 7, "product": {"id": 3, "title": "Steel Tumbler", "price": "100.00"}, "quantity": 5}],
                "total_items": 5,
                "total_price": "500.00"
            }))
            .unwrap(),
            ..ViewState::default()
        };
        let addresses: Vec<Address> = serde_json::from_value(serde_json::json!([
            {"id": 1, "full_name": "Asha", "phone": "1", "line1": "A", "city": "Pune", "state": "MH", "pincode": "411001"},
            {"id": 2, "full_name": "Ravi", "phone": "2", "line1": "B", "city": "Goa", "state": "GA", "pincode": "403001"}
        ]))
        .unwrap();

        let text = cart(&state, &addresses, Some(AddressId::new(2)));
        assert!(text.contains("₹500.00"));
        assert!(text.contains(" * [2] Ravi"));
        assert!(text.contains("   [1] Asha"));
    }

    #[test]
    fn test_overflowing_line_total_shows_placeholder() {
        let mut order = sample_order();
        order.items = serde_json::from_value(serde_json::json!([
            {"id": 1, "product": 3, "quantity": 2, "price": "79228162514264337593543950335"}
        ]))
        .unwrap();

        let text = super::order(&order);
        assert!(text.contains("n/a"));
        assert!(text.contains("Total: ₹200.00"));
    }

    #[test]
    fn test_field_errors() {
        let mut errors = FieldErrors::default();
        errors.push("old_password", "Old password is incorrect.");
        assert_eq!(field_errors(&errors), "  old_password: Old password is incorrect.");
    }
}
