//! # GoMarket
//!
//! Shopping-cart state for the GoMarket storefront client, persisted through
//! a key-value store.
//!
//! ## Overview
//!
//! - **Cart store**: the authoritative in-memory cart with `add_to_cart`,
//!   `increment` and `decrement`, mirrored into storage after every change
//! - **Provider / context**: one mounted store per application, reached by
//!   consumers through a context; using a context outside a provider is a
//!   configuration error
//! - **App shell**: the composition root that mounts the provider
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gomarket::{AppShell, CartConfig};
//! use gomarket::core::{ProductDescriptor, ProductId};
//! use gomarket::store::SqliteStore;
//!
//! async fn example() {
//!     let backend = SqliteStore::open("gomarket.db").unwrap();
//!     let app = AppShell::bootstrap(backend, CartConfig::default()).await;
//!
//!     let cart = app.context().use_cart().unwrap();
//!     cart.add_to_cart(ProductDescriptor::new("p1", "Shirt", "https://...", 10.0)).unwrap();
//!     cart.increment(&ProductId::new("p1")).unwrap();
//!
//!     app.shutdown().await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `gomarket::core` - Line items and the cart state machine
//! - `gomarket::store` - Key-value storage abstraction and SQLite

pub mod app;
pub mod cart_store;
pub mod config;
pub mod error;
pub mod persist;
pub mod provider;

// Re-export component crates
pub use gomarket_core as core;
pub use gomarket_store as store;

// Re-export main types for convenience
pub use app::AppShell;
pub use cart_store::{CartStore, LoadOutcome};
pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::{CartError, Result};
pub use persist::PersistStatus;
pub use provider::{CartContext, CartProvider};

pub use gomarket_core::{
    AddOutcome, DecrementOutcome, LineItem, ProductDescriptor, ProductId, ZeroQuantityPolicy,
};
