//! Address book.
//!
//! | mutation    | rule                                                 |
//! |-------------|------------------------------------------------------|
//! | create      | local patch: prepend the server's address            |
//! | delete      | local patch: drop the address                        |
//! | set default | local patch: `is_default = (id == X)` on every entry |

use std::fmt;

use shopvely_core::AddressId;

use super::{View, ViewState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::gateways::addresses;
use crate::models::{Address, NewAddress};

/// What an address mutation is working on. Creation has no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSlot {
    New,
    Existing(AddressId),
}

impl fmt::Display for AddressSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("new address"),
            Self::Existing(id) => write!(f, "address {id}"),
        }
    }
}

pub type AddressesState = ViewState<Vec<Address>, AddressSlot>;

#[derive(Debug, Clone)]
pub struct AddressesView {
    list: View<Vec<Address>, AddressSlot>,
}

impl Default for AddressesView {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressesView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: View::new("addresses"),
        }
    }

    #[must_use]
    pub fn with_addresses(addresses: Vec<Address>) -> Self {
        Self {
            list: View::with_data("addresses", addresses),
        }
    }

    /// Fetch the address book.
    ///
    /// # Errors
    ///
    /// Returns the load error; the view is left empty with an error message.
    pub async fn load(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.list.load(addresses::get_addresses(api)).await
    }

    pub async fn state(&self) -> AddressesState {
        self.list.snapshot().await
    }

    pub fn unmount(&self) {
        self.list.unmount();
    }

    /// The default address, if one is flagged.
    pub async fn default_address(&self) -> Option<Address> {
        self.list
            .read(|items| items.iter().find(|a| a.is_default).cloned())
            .await
    }

    /// Save a new address and put it at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for blank required fields, otherwise
    /// the request error. An alert notice is set in both cases.
    pub async fn create(&self, api: &ApiClient, payload: &NewAddress) -> Result<Address, ApiError> {
        self.list
            .mutate(
                AddressSlot::New,
                "add address",
                addresses::create_address(api, payload),
                prepend_created,
            )
            .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the list is
    /// unchanged.
    pub async fn delete(&self, api: &ApiClient, id: AddressId) -> Result<(), ApiError> {
        self.list
            .mutate(
                AddressSlot::Existing(id),
                "delete address",
                addresses::delete_address(api, id),
                |items, ()| items.retain(|a| a.id != id),
            )
            .await
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns the request error; an alert notice is set and the list is
    /// unchanged.
    pub async fn set_default(&self, api: &ApiClient, id: AddressId) -> Result<Address, ApiError> {
        self.list
            .mutate(
                AddressSlot::Existing(id),
                "set default address",
                addresses::set_default_address(api, id),
                |items, updated| mark_default(items, updated),
            )
            .await
    }
}

fn prepend_created(items: &mut Vec<Address>, created: &Address) {
    if created.is_default {
        for address in items.iter_mut() {
            address.is_default = false;
        }
    }
    items.insert(0, created.clone());
}

/// Take the server's copy of the new default and clear the flag everywhere
/// else.
fn mark_default(items: &mut [Address], updated: &Address) {
    for address in items.iter_mut() {
        if address.id == updated.id {
            address.clone_from(updated);
        }
        address.is_default = address.id == updated.id;
    }
}

/// Address to pre-select at checkout: the default, else the first.
#[must_use]
pub fn preferred_address(addresses: &[Address]) -> Option<AddressId> {
    addresses
        .iter()
        .find(|a| a.is_default)
        .or_else(|| addresses.first())
        .map(|a| a.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(id: i64, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            full_name: "Asha Rao".to_string(),
            phone: "9800000000".to_string(),
            line1: format!("{id} MG Road"),
            line2: String::new(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: "411001".to_string(),
            is_default,
            created_at: None,
        }
    }

    #[test]
    fn test_preferred_address() {
        assert_eq!(
            preferred_address(&[address(1, false), address(2, true)]),
            Some(AddressId::new(2))
        );
        assert_eq!(
            preferred_address(&[address(1, false), address(2, false)]),
            Some(AddressId::new(1))
        );
        assert_eq!(preferred_address(&[]), None);
    }

    #[test]
    fn test_mark_default_leaves_exactly_one() {
        let mut items = vec![address(1, true), address(2, false), address(3, false)];
        mark_default(&mut items, &address(3, true));

        let defaults: Vec<AddressId> = items
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id)
            .collect();
        assert_eq!(defaults, vec![AddressId::new(3)]);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_prepend_default_clears_others() {
        let mut items = vec![address(1, true)];
        prepend_created(&mut items, &address(9, true));

        assert_eq!(items.first().unwrap().id, AddressId::new(9));
        assert!(!items.get(1).unwrap().is_default);

        prepend_created(&mut items, &address(10, false));
        assert!(items.get(1).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_default_address() {
        let view = AddressesView::with_addresses(vec![address(1, false), address(2, true)]);
        assert_eq!(view.default_address().await.unwrap().id, AddressId::new(2));
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(AddressSlot::New.to_string(), "new address");
        assert_eq!(
            AddressSlot::Existing(AddressId::new(3)).to_string(),
            "address 3"
        );
    }
}
