//! Saved addresses.

use shopvely_core::AddressId;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{ApiError, FieldErrors};
use crate::models::{Address, NewAddress};

/// All saved addresses.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(api))]
pub async fn get_addresses(api: &ApiClient) -> Result<Vec<Address>, ApiError> {
    api.get("/addresses/").await
}

/// Save a new address.
///
/// Blank required fields are rejected before sending, with the same message
/// the server would use.
///
/// # Errors
///
/// Returns `ApiError::Validation` for blank required fields or server-side
/// field errors.
#[instrument(skip(api, payload))]
pub async fn create_address(api: &ApiClient, payload: &NewAddress) -> Result<Address, ApiError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        let mut errors = FieldErrors::default();
        for field in missing {
            errors.push(field, "This field is required.");
        }
        return Err(ApiError::Validation(errors));
    }

    api.post("/addresses/", payload).await
}

/// Delete an address.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an unknown id.
#[instrument(skip(api))]
pub async fn delete_address(api: &ApiClient, id: AddressId) -> Result<(), ApiError> {
    api.delete(&format!("/addresses/{id}/")).await
}

/// Make an address the default. The server clears the flag on the others.
///
/// # Errors
///
/// Returns `ApiError::Status` with 404 for an unknown id.
#[instrument(skip(api))]
pub async fn set_default_address(api: &ApiClient, id: AddressId) -> Result<Address, ApiError> {
    api.post_empty(&format!("/addresses/{id}/set-default/"))
        .await
}
