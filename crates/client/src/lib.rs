//! Shopvely Client - Storefront session, API access and view state.
//!
//! # Architecture
//!
//! ```text
//! views (cart, orders, wishlist, addresses, products)
//!   -> gateways (typed endpoint functions)
//!     -> ApiClient (bearer token in, session guard out)
//!       -> SessionStore (watch slot + persisted file)
//! ```
//!
//! Views own a local copy of a server-side list. They load it on mount and
//! mutate it either by replacing it with the server's answer or by patching
//! it locally once the server has confirmed the change.
//!
//! Every request goes through [`ApiClient`]. A 401 from any endpoint clears
//! the session and asks the [`Navigator`] for the login view.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`session`] - Auth session store and persistence
//! - [`api`] - Request client and session guard
//! - [`gateways`] - One module per backend resource
//! - [`views`] - List view state machines
//! - [`models`] - Wire types
//! - [`navigation`] - Frontend navigation seam

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod gateways;
pub mod models;
pub mod navigation;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind, FieldErrors};
pub use navigation::{LogNavigator, Navigator, Route};
pub use session::{Session, SessionStore};
