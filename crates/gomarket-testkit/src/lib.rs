//! # GoMarket Testkit
//!
//! Testing utilities for the GoMarket cart.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a small product catalog and pre-seeded stores
//! - **Generators**: Proptest strategies for products, stored carts and
//!   operation sequences
//! - **Instrumented stores**: [`FlakyStore`] injects storage failures,
//!   [`RecordingStore`] records every write
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use gomarket_testkit::generators::{cart_ops, apply_op};
//!
//! proptest! {
//!     #[test]
//!     fn ids_stay_unique(ops in cart_ops(50)) {
//!         let mut cart = gomarket_core::Cart::new();
//!         for op in &ops {
//!             apply_op(&mut cart, op);
//!         }
//!     }
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! use gomarket_testkit::fixtures::{shirt, stored_cart};
//!
//! let store = stored_cart(&[shirt().into_line_item(2)]);
//! assert_eq!(store.len(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod stores;

pub use fixtures::{catalog, shirt, stored_cart, stored_raw};
pub use generators::{apply_op, cart_ops, CartOp};
pub use stores::{FlakyStore, RecordingStore};
