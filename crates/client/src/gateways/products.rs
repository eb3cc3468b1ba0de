//! Product catalog. Readable without a session.

use shopvely_core::ProductId;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Product;

/// All products, newest first.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn list_products(api: &ApiClient) -> Result<Vec<Product>, ApiError> {
    api.get("/products/").await
}

/// One product.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an unknown id.
#[instrument(skip(api))]
pub async fn get_product(api: &ApiClient, id: ProductId) -> Result<Product, ApiError> {
    api.get(&format!("/products/{id}/")).await
}
