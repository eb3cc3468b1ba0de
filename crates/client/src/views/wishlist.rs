//! Wishlist page.
//!
//! | mutation     | rule                                             |
//! |--------------|--------------------------------------------------|
//! | remove       | local patch: drop the product                    |
//! | move to cart | local patch: drop the product after both calls   |
//! | toggle       | add replaces the list with the server's; remove patches |

use reqwest::StatusCode;
use shopvely_core::ProductId;

use super::{Keyed, ListState, ListView, Notice, View};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::gateways::{cart, wishlist};
use crate::models::{Wishlist, WishlistEntry};

/// Detail the API uses when removing a product that is not saved.
const NOT_IN_WISHLIST_DETAIL: &str = "Product not in wishlist";

impl Keyed for WishlistEntry {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.id
    }
}

/// Outcome of [`WishlistView::toggle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Toggled {
    Added(Wishlist),
    Removed,
}

#[derive(Debug, Clone)]
pub struct WishlistView {
    list: ListView<WishlistEntry>,
}

impl Default for WishlistView {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: View::new("wishlist"),
        }
    }

    #[must_use]
    pub fn with_entries(entries: Vec<WishlistEntry>) -> Self {
        Self {
            list: View::with_data("wishlist", entries),
        }
    }

    /// Fetch the saved products.
    ///
    /// # Errors
    ///
    /// Returns the load error; the view is left empty with an error message.
    pub async fn load(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.list
            .load(async { wishlist::get_wishlist(api).await.map(|w| w.products) })
            .await
    }

    pub async fn state(&self) -> ListState<WishlistEntry> {
        self.list.snapshot().await
    }

    pub fn unmount(&self) {
        self.list.unmount();
    }

    /// Remove a product.
    ///
    /// Removing a product the server no longer has counts as done.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the list is
    /// unchanged.
    pub async fn remove(&self, api: &ApiClient, product_id: ProductId) -> Result<(), ApiError> {
        let request = async {
            match wishlist::remove_from_wishlist(api, product_id).await {
                Ok(_) => Ok(()),
                Err(e) if is_not_in_wishlist(&e) => {
                    tracing::debug!(%product_id, "Product was already gone from wishlist");
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        self.list
            .mutate(product_id, "remove from wishlist", request, |items, ()| {
                items.retain(|p| p.id != product_id);
            })
            .await
    }

    /// Add one unit to the cart, then drop the product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error; an alert notice is set and
    /// the list is unchanged.
    pub async fn move_to_cart(&self, api: &ApiClient, product_id: ProductId) -> Result<(), ApiError> {
        let request = async {
            cart::add_to_cart(api, product_id, 1).await?;
            wishlist::remove_from_wishlist(api, product_id).await?;
            Ok::<_, ApiError>(())
        };

        self.list
            .mutate(product_id, "move to cart", request, |items, ()| {
                items.retain(|p| p.id != product_id);
            })
            .await?;
        self.list
            .set_notice(Notice::Success("Moved to cart".to_string()))
            .await;
        Ok(())
    }

    /// Save a product, or un-save it if the server says it is already saved.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the list is
    /// unchanged.
    pub async fn toggle(&self, api: &ApiClient, product_id: ProductId) -> Result<Toggled, ApiError> {
        let request = async {
            match wishlist::add_to_wishlist(api, product_id).await {
                Ok(list) => Ok::<_, ApiError>(Toggled::Added(list)),
                Err(ApiError::AlreadyInWishlist) => {
                    wishlist::remove_from_wishlist(api, product_id).await?;
                    Ok(Toggled::Removed)
                }
                Err(e) => Err(e),
            }
        };

        let toggled = self
            .list
            .mutate(product_id, "update wishlist", request, |items, toggled| {
                match toggled {
                    Toggled::Added(list) => items.clone_from(&list.products),
                    Toggled::Removed => items.retain(|p| p.id != product_id),
                }
            })
            .await?;

        let message = match toggled {
            Toggled::Added(_) => "Added to wishlist!",
            Toggled::Removed => "Removed from wishlist!",
        };
        self.list
            .set_notice(Notice::Success(message.to_string()))
            .await;
        Ok(toggled)
    }
}

fn is_not_in_wishlist(error: &ApiError) -> bool {
    matches!(
        error,
        ApiError::Status { status, detail }
            if *status == StatusCode::BAD_REQUEST && detail == NOT_IN_WISHLIST_DETAIL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_wishlist_detection() {
        let gone = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            detail: NOT_IN_WISHLIST_DETAIL.to_string(),
        };
        assert!(is_not_in_wishlist(&gone));

        let missing_product = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: "Product not found".to_string(),
        };
        assert!(!is_not_in_wishlist(&missing_product));
    }
}
