//! Cart page.
//!
//! The cart is server-owned: quantity changes, removals and adds replace the
//! local cart with the one the server returns, so line totals always come
//! from a single response. Checkout is the exception; the server empties the
//! cart and answers only with the order id, so the local copy is emptied in
//! place.
//!
//! The page also shows the address book for choosing a delivery address.
//! Cart and addresses load concurrently and either may finish first.

use std::sync::Arc;

use shopvely_core::{AddressId, CartItemId, ProductId};
use tokio::sync::RwLock;

use super::addresses::{AddressSlot, preferred_address};
use super::{Notice, View, ViewState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::gateways::{addresses, cart};
use crate::models::{Address, Cart, CheckoutReceipt};

/// What a cart mutation is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartAction {
    Add(ProductId),
    Item(CartItemId),
    Checkout,
}

pub type CartState = ViewState<Cart, CartAction>;

#[derive(Debug, Clone)]
pub struct CartView {
    cart: View<Cart, CartAction>,
    addresses: View<Vec<Address>, AddressSlot>,
    selected: Arc<RwLock<Option<AddressId>>>,
}

impl Default for CartView {
    fn default() -> Self {
        Self::new()
    }
}

impl CartView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cart: View::new("cart"),
            addresses: View::new("addresses"),
            selected: Arc::new(RwLock::new(None)),
        }
    }

    /// Load cart and addresses concurrently.
    ///
    /// # Errors
    ///
    /// Returns the cart error if the cart failed, else the address error.
    /// Each half records its own failure in its state either way.
    pub async fn mount(&self, api: &ApiClient) -> Result<(), ApiError> {
        let (cart, addresses) = tokio::join!(self.load_cart(api), self.load_addresses(api));
        cart.and(addresses)
    }

    /// Fetch the cart.
    ///
    /// # Errors
    ///
    /// Returns the load error; the cart is left empty with an error message.
    pub async fn load_cart(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.cart.load(cart::get_cart(api)).await
    }

    /// Fetch the address book and pre-select the default address.
    ///
    /// # Errors
    ///
    /// Returns the load error; no address is selected.
    pub async fn load_addresses(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.addresses.load(addresses::get_addresses(api)).await?;
        if !self.addresses.is_mounted() {
            return Ok(());
        }

        // Keep the user's choice if it survived the reload
        let current = *self.selected.read().await;
        let choice = self
            .addresses
            .read(|list| match current {
                Some(id) if list.iter().any(|a| a.id == id) => Some(id),
                _ => preferred_address(list),
            })
            .await;
        *self.selected.write().await = choice;
        Ok(())
    }

    pub fn unmount(&self) {
        self.cart.unmount();
        self.addresses.unmount();
    }

    pub async fn state(&self) -> CartState {
        self.cart.snapshot().await
    }

    pub async fn addresses(&self) -> ViewState<Vec<Address>, AddressSlot> {
        self.addresses.snapshot().await
    }

    pub async fn selected_address(&self) -> Option<AddressId> {
        *self.selected.read().await
    }

    /// Choose the delivery address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if `id` is not in the address book.
    pub async fn select_address(&self, id: AddressId) -> Result<(), ApiError> {
        let known = self
            .addresses
            .read(|list| list.iter().any(|a| a.id == id))
            .await;
        if !known {
            return Err(ApiError::InvalidInput(format!("Unknown address {id}")));
        }
        *self.selected.write().await = Some(id);
        Ok(())
    }

    /// Add units of a product.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the cart is
    /// unchanged.
    pub async fn add(
        &self,
        api: &ApiClient,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.cart
            .mutate(
                CartAction::Add(product_id),
                "add to cart",
                cart::add_to_cart(api, product_id, quantity),
                replace_cart,
            )
            .await
            .map(drop)
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the cart is
    /// unchanged.
    pub async fn update_quantity(
        &self,
        api: &ApiClient,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.cart
            .mutate(
                CartAction::Item(item_id),
                "update quantity",
                cart::update_quantity(api, item_id, quantity),
                replace_cart,
            )
            .await
            .map(drop)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the cart is
    /// unchanged.
    pub async fn remove_item(&self, api: &ApiClient, item_id: CartItemId) -> Result<(), ApiError> {
        self.cart
            .mutate(
                CartAction::Item(item_id),
                "remove item",
                cart::remove_item(api, item_id),
                replace_cart,
            )
            .await
            .map(drop)
    }

    /// Place the order to the selected address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` without sending anything if no
    /// address is selected or the cart is empty, otherwise the request
    /// error. An alert notice is set in every failure case.
    pub async fn checkout(&self, api: &ApiClient) -> Result<CheckoutReceipt, ApiError> {
        let Some(address_id) = self.selected_address().await else {
            return self.refuse("Please select a delivery address.").await;
        };
        if self.cart.read(Cart::is_empty).await {
            return self.refuse("Your cart is empty.").await;
        }

        let receipt = self
            .cart
            .mutate(
                CartAction::Checkout,
                "place order",
                cart::checkout_cart(api, address_id),
                |cart, _| *cart = cart.emptied(),
            )
            .await?;
        self.cart
            .set_notice(Notice::Success(receipt.confirmation()))
            .await;
        Ok(receipt)
    }

    async fn refuse<T>(&self, message: &str) -> Result<T, ApiError> {
        self.cart
            .set_notice(Notice::Alert(message.to_string()))
            .await;
        Err(ApiError::InvalidInput(message.to_string()))
    }
}

/// Authoritative reconcile: the server's cart wins wholesale.
fn replace_cart(cart: &mut Cart, fresh: &Cart) {
    cart.clone_from(fresh);
}
