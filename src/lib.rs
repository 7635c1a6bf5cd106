//! storefront: catalog, cart and admin console for a remote product API
//!
//! This library provides:
//! - An in-memory cart aggregate with derived totals ([`cart`])
//! - A typed client and tag-invalidated query cache for the product API ([`catalog`])
//! - Product form validation and CRUD for the admin console ([`admin`])
//! - The terminal front end: one-shot commands and an interactive shop ([`transport`])

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod notice;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use cart::{CartAction, CartState, CartStore, LineItem, ProductSnapshot};
pub use catalog::{ApiError, CachedCatalog, Product, ProductApi, ProductSource};
pub use config::Config;
