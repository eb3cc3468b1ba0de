//! Cart and checkout.
//!
//! Every cart mutation returns the full cart as the server now sees it.

use serde::Serialize;
use shopvely_core::{AddressId, CartItemId, ProductId};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Cart, CartSummary, CheckoutReceipt};

const CART_PATH: &str = "/cart/";

#[derive(Serialize)]
struct AddItem {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct UpdateItem {
    item_id: CartItemId,
    quantity: u32,
}

#[derive(Serialize)]
struct RemoveItem {
    item_id: CartItemId,
}

#[derive(Serialize)]
struct Checkout {
    address_id: AddressId,
}

fn require_positive(quantity: u32) -> Result<(), ApiError> {
    if quantity == 0 {
        return Err(ApiError::InvalidInput(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// The current user's cart.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn get_cart(api: &ApiClient) -> Result<Cart, ApiError> {
    api.get(CART_PATH).await
}

/// Cart with the line count for the navigation badge.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn cart_summary(api: &ApiClient) -> Result<CartSummary, ApiError> {
    get_cart(api).await.map(CartSummary::from)
}

/// Add `quantity` units of a product. Adding a product already in the cart
/// increases its quantity.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a zero quantity,
/// `ApiError::Status` with 404 for an unknown product.
#[instrument(skip(api))]
pub async fn add_to_cart(
    api: &ApiClient,
    product_id: ProductId,
    quantity: u32,
) -> Result<Cart, ApiError> {
    require_positive(quantity)?;
    api.post(
        CART_PATH,
        &AddItem {
            product_id,
            quantity,
        },
    )
    .await
}

/// Set the quantity of a line.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a zero quantity (use
/// [`remove_item`]), `ApiError::Status` with 404 for an unknown line.
#[instrument(skip(api))]
pub async fn update_quantity(
    api: &ApiClient,
    item_id: CartItemId,
    quantity: u32,
) -> Result<Cart, ApiError> {
    require_positive(quantity)?;
    api.patch(CART_PATH, &UpdateItem { item_id, quantity }).await
}

/// Remove a line.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an unknown line.
#[instrument(skip(api))]
pub async fn remove_item(api: &ApiClient, item_id: CartItemId) -> Result<Cart, ApiError> {
    api.delete_with(CART_PATH, &RemoveItem { item_id }).await
}

/// Turn the cart into an order shipped to `address_id`. The server empties
/// the cart.
///
/// # Errors
///
/// Returns `ApiError::Status` with 400 for an empty cart and 404 for an
/// unknown address.
#[instrument(skip(api))]
pub async fn checkout_cart(
    api: &ApiClient,
    address_id: AddressId,
) -> Result<CheckoutReceipt, ApiError> {
    let receipt: CheckoutReceipt = api
        .post("/cart/checkout/", &Checkout { address_id })
        .await?;
    tracing::info!(order_id = %receipt.order_id, "Order placed");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            require_positive(0),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(require_positive(1).is_ok());
    }
}
