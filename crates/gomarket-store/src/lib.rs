//! # GoMarket Store
//!
//! Persistent key-value storage for the GoMarket cart. Provides a trait-based
//! interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The cart only ever needs two operations on durable storage: read a string
//! under a key and write a string under a key. [`KeyValueStore`] captures that
//! contract so the cart is storage-agnostic. The primary implementation is
//! [`SqliteStore`], with [`MemoryStore`] for tests and ephemeral sessions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gomarket_store::{KeyValueStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("gomarket.db").unwrap();
//!
//!     store.set("@GoMarket:products", "[]").await.unwrap();
//!     let value = store.get("@GoMarket:products").await.unwrap();
//!     assert_eq!(value.as_deref(), Some("[]"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Last write wins**: `set` overwrites; there is no compare-and-swap.
//! - **Single writer**: one cart store per key is assumed; concurrent external
//!   writers can lose updates.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
