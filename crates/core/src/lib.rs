//! Sr. Robot Core - Shared domain library.
//!
//! This crate provides the domain types and pure logic used by the
//! Sr. Robot components:
//! - `storefront` - Shop API (catalog, cart, checkout, admin dashboard)
//! - `cli` - Command-line tools for configuration and catalog inspection
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no network,
//! no filesystem, no HTTP. Persistence is reached through the
//! [`storage::KeyValueStore`] trait so backends stay swappable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices and filter statuses
//! - [`product`] - Catalog records and the admin product form
//! - [`catalog`] - Filtering and sorting of the product list
//! - [`cart`] - Cart aggregation and the favorites set
//! - [`order`] - Orders created at checkout
//! - [`user`] - Session user record
//! - [`storage`] - Key-value persistence interface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod product;
pub mod storage;
pub mod types;
pub mod user;

pub use cart::{Cart, CartLine, Favorites};
pub use catalog::{CatalogQuery, SortKey, filter_and_sort};
pub use order::{Customer, Order, OrderItem, OrderQuery};
pub use product::{FieldErrors, MAX_PRICE, Product, ProductDraft};
pub use storage::{KeyValueStore, KeyValueStoreExt, MemoryStore, StorageError};
pub use types::*;
pub use user::User;
