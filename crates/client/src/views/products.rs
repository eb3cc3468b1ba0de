//! Catalog page.

use shopvely_core::ProductId;

use super::{Keyed, ListState, ListView, Notice, View};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::gateways::{cart, products, wishlist};
use crate::models::Product;

impl Keyed for Product {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.id
    }
}

/// Product listing with search, add-to-cart and wishlist hearts.
#[derive(Debug, Clone)]
pub struct ProductsView {
    list: ListView<Product>,
}

impl Default for ProductsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductsView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: View::new("products"),
        }
    }

    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns the load error; the view is left empty with an error message.
    pub async fn load(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.list.load(products::list_products(api)).await
    }

    pub async fn state(&self) -> ListState<Product> {
        self.list.snapshot().await
    }

    /// Products whose title contains `query`, ignoring case. A blank query
    /// matches everything.
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        self.list
            .read(|items| {
                items
                    .iter()
                    .filter(|p| needle.is_empty() || p.title_matches(&needle))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Add one unit to the cart. The catalog itself does not change.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set.
    pub async fn add_to_cart(&self, api: &ApiClient, product_id: ProductId) -> Result<(), ApiError> {
        self.list
            .mutate(
                product_id,
                "add to cart",
                cart::add_to_cart(api, product_id, 1),
                |_, _| {},
            )
            .await?;
        self.list
            .set_notice(Notice::Success("Added to cart!".to_string()))
            .await;
        Ok(())
    }

    /// Flip the wishlist heart on a product. Returns whether it is now saved.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the heart is
    /// left as it was.
    pub async fn toggle_wishlist(
        &self,
        api: &ApiClient,
        product_id: ProductId,
    ) -> Result<bool, ApiError> {
        let saved = self
            .list
            .read(|items| items.iter().any(|p| p.id == product_id && p.is_in_wishlist))
            .await;

        let request = async {
            if saved {
                wishlist::remove_from_wishlist(api, product_id).await?;
            } else {
                wishlist::add_to_wishlist(api, product_id).await?;
            }
            Ok::<_, ApiError>(!saved)
        };

        // Local patch: only the heart on this product changes
        self.list
            .mutate(product_id, "update wishlist", request, |items, now_saved| {
                for product in items.iter_mut().filter(|p| p.id == product_id) {
                    product.is_in_wishlist = *now_saved;
                }
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "Brass Diya Set", "price": "450.00"},
            {"id": 2, "title": "Cotton Kurta", "price": "1299.00"},
            {"id": 3, "title": "Diya Stand", "price": "800.00"}
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let view = ProductsView {
            list: View::with_data("products", catalog()),
        };

        let hits: Vec<ProductId> = view.search("  DIYA ").await.iter().map(|p| p.id).collect();
        assert_eq!(hits, vec![ProductId::new(1), ProductId::new(3)]);

        assert_eq!(view.search("").await.len(), 3);
        assert!(view.search("saree").await.is_empty());
    }
}
