//! Wire types for the storefront REST API.
//!
//! Field names match the JSON the API sends. Unknown fields are ignored and
//! optional ones default, so older and newer servers both deserialize.

pub mod address;
pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod wishlist;

pub use address::{Address, NewAddress};
pub use auth::{Ack, RefreshedToken, RegisteredUser, TokenPair};
pub use cart::{Cart, CartItem, CartProduct, CartSummary, CheckoutReceipt};
pub use order::{Invoice, Order, OrderItem, StatusChange};
pub use product::Product;
pub use wishlist::{Wishlist, WishlistEntry};
