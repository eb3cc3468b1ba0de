//! Order history and invoices.

use shopvely_core::OrderId;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Invoice, Order};

/// The user's orders, newest first.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn list_orders(api: &ApiClient) -> Result<Vec<Order>, ApiError> {
    api.get("/orders/").await
}

/// One order.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an order that is not the user's.
#[instrument(skip(api))]
pub async fn get_order(api: &ApiClient, id: OrderId) -> Result<Order, ApiError> {
    api.get(&format!("/orders/{id}/")).await
}

/// The printable invoice for an order.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an order that is not the user's.
#[instrument(skip(api))]
pub async fn download_invoice(api: &ApiClient, id: OrderId) -> Result<Invoice, ApiError> {
    let body = api.get_text(&format!("/orders/{id}/invoice/")).await?;
    Ok(Invoice {
        order_id: id,
        content_type: body.content_type,
        body: body.text,
    })
}
