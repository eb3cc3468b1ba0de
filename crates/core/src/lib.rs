//! Shopvely Core - Shared value types.
//!
//! This crate provides the small value types used across the Shopvely
//! storefront client:
//! - `client` - Session, request client, resource gateways and view state
//! - `cli` - Command-line frontend driving the views
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
