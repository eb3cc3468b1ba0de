//! Resource gateways.
//!
//! Thin typed functions, one module per backend resource. Each builds a path
//! and a body, calls [`ApiClient`](crate::ApiClient), and hands back the
//! decoded result or the error unchanged. Nothing here retries or keeps
//! state; the session is the only thing a gateway ever writes to.

pub mod account;
pub mod addresses;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;
