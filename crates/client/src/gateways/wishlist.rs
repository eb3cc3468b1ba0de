//! Wishlist.

use serde::Serialize;
use shopvely_core::ProductId;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Wishlist;

const WISHLIST_PATH: &str = "/products/wishlist/";

#[derive(Serialize)]
struct ProductRef {
    product_id: ProductId,
}

/// The current user's wishlist.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn get_wishlist(api: &ApiClient) -> Result<Wishlist, ApiError> {
    api.get(WISHLIST_PATH).await
}

/// Save a product.
///
/// # Errors
///
/// Returns `ApiError::AlreadyInWishlist` if it is already saved.
#[instrument(skip(api))]
pub async fn add_to_wishlist(api: &ApiClient, product_id: ProductId) -> Result<Wishlist, ApiError> {
    api.post(WISHLIST_PATH, &ProductRef { product_id }).await
}

/// Remove a saved product.
///
/// # Errors
///
/// Returns `ApiError::Status` with 400 if the product is not saved.
#[instrument(skip(api))]
pub async fn remove_from_wishlist(
    api: &ApiClient,
    product_id: ProductId,
) -> Result<Wishlist, ApiError> {
    api.delete_with(WISHLIST_PATH, &ProductRef { product_id })
        .await
}
