//! Order history and order detail.
//!
//! Filtering and search are pure local transforms over the loaded list.
//! The detail page's actions add items to the cart and never change the
//! order itself.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use shopvely_core::{OrderId, OrderStatus, ProductId};

use super::{Keyed, ListState, ListView, Notice, View, ViewState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::gateways::{cart, orders};
use crate::models::{Invoice, Order};

impl Keyed for Order {
    type Key = OrderId;

    fn key(&self) -> OrderId {
        self.id
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Status dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<OrderStatus>().map(Self::Only)
    }
}

/// Date dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    AnyTime,
    Last30Days,
    Last180Days,
}

impl DateRange {
    /// Oldest creation time still inside the range.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::AnyTime => None,
            Self::Last30Days => Some(now - Duration::days(30)),
            Self::Last180Days => Some(now - Duration::days(180)),
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "any" => Ok(Self::AnyTime),
            "30" => Ok(Self::Last30Days),
            "180" => Ok(Self::Last180Days),
            other => Err(format!(
                "unknown date range '{other}' (expected all, 30 or 180)"
            )),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AnyTime => "Any time",
            Self::Last30Days => "Last 30 days",
            Self::Last180Days => "Last 6 months",
        })
    }
}

/// Everything the orders toolbar can narrow by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: StatusFilter,
    pub date: DateRange,
    /// Substring of the order id.
    pub search: String,
}

impl OrderFilter {
    /// Whether any control is set away from its default.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || self.date != DateRange::AnyTime
            || !self.search.trim().is_empty()
    }

    /// Orders passing every control, in their original order.
    #[must_use]
    pub fn apply(&self, orders: &[Order], now: DateTime<Utc>) -> Vec<Order> {
        let cutoff = self.date.cutoff(now);
        let term = self.search.trim().to_lowercase();

        orders
            .iter()
            .filter(|o| self.status.matches(o.status))
            .filter(|o| cutoff.is_none_or(|c| o.created_at >= c))
            .filter(|o| term.is_empty() || o.id.to_string().to_lowercase().contains(&term))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Order List
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrdersView {
    list: ListView<Order>,
}

impl Default for OrdersView {
    fn default() -> Self {
        Self::new()
    }
}

impl OrdersView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: View::new("orders"),
        }
    }

    #[must_use]
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            list: View::with_data("orders", orders),
        }
    }

    /// Fetch the order history.
    ///
    /// # Errors
    ///
    /// Returns the load error; the view is left empty and `error` is set for
    /// the error panel.
    pub async fn load(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.list.load(orders::list_orders(api)).await
    }

    pub async fn state(&self) -> ListState<Order> {
        self.list.snapshot().await
    }

    pub fn unmount(&self) {
        self.list.unmount();
    }

    /// Orders passing `filter`, with date ranges measured back from `now`.
    pub async fn filtered(&self, filter: &OrderFilter, now: DateTime<Utc>) -> Vec<Order> {
        self.list.read(|items| filter.apply(items, now)).await
    }
}

// =============================================================================
// Order Detail
// =============================================================================

/// What an order detail action is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    BuyAgain(ProductId),
    ReorderAll,
    Invoice,
}

pub type OrderDetailState = ViewState<Option<Order>, OrderAction>;

#[derive(Debug, Clone)]
pub struct OrderDetailView {
    order: View<Option<Order>, OrderAction>,
}

impl Default for OrderDetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderDetailView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: View::new("order"),
        }
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns the load error; the view holds no order and an error message.
    pub async fn load(&self, api: &ApiClient, id: OrderId) -> Result<(), ApiError> {
        self.order
            .load(async { orders::get_order(api, id).await.map(Some) })
            .await
    }

    pub async fn state(&self) -> OrderDetailState {
        self.order.snapshot().await
    }

    /// Put `quantity` units of one ordered product back in the cart.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set.
    pub async fn buy_again(
        &self,
        api: &ApiClient,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.order
            .mutate(
                OrderAction::BuyAgain(product_id),
                "add to cart",
                cart::add_to_cart(api, product_id, quantity),
                |_, _| {},
            )
            .await?;
        self.order
            .set_notice(Notice::Success("Added to cart again".to_string()))
            .await;
        Ok(())
    }

    /// Add every line of the order to the cart with its original quantity,
    /// one request at a time. Stops at the first failure; lines added before
    /// it stay in the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if no order is loaded, otherwise the
    /// first request error.
    pub async fn reorder_all(&self, api: &ApiClient) -> Result<usize, ApiError> {
        let lines: Vec<(ProductId, u32)> = self
            .order
            .read(|order| {
                order
                    .iter()
                    .flat_map(|o| o.items.iter().map(|item| (item.product, item.quantity)))
                    .collect()
            })
            .await;
        if lines.is_empty() {
            return Err(ApiError::InvalidInput("No items to reorder".to_string()));
        }

        let request = async {
            for (product_id, quantity) in &lines {
                cart::add_to_cart(api, *product_id, *quantity).await?;
            }
            Ok::<_, ApiError>(lines.len())
        };

        let added = self
            .order
            .mutate(OrderAction::ReorderAll, "reorder items", request, |_, _| {})
            .await?;
        self.order
            .set_notice(Notice::Success("All items added to cart".to_string()))
            .await;
        Ok(added)
    }

    /// Download the printable invoice.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set.
    pub async fn download_invoice(&self, api: &ApiClient) -> Result<Invoice, ApiError> {
        let Some(id) = self.order.read(|order| order.as_ref().map(|o| o.id)).await else {
            return Err(ApiError::InvalidInput("No order loaded".to_string()));
        };
        self.order
            .mutate(
                OrderAction::Invoice,
                "download invoice",
                orders::download_invoice(api, id),
                |_, _| {},
            )
            .await
    }
}
