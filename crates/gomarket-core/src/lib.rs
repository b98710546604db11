//! # GoMarket Core
//!
//! Pure cart primitives: line items, the cart state machine, and the JSON
//! encoding used to mirror a cart into key-value storage.
//!
//! This crate contains no I/O, no storage, no async. Everything here is plain
//! computation over an ordered list of line items.
//!
//! ## Key Types
//!
//! - [`ProductId`] - Identity of a product, unique within a cart
//! - [`ProductDescriptor`] - A product as offered to `add`, without a quantity
//! - [`LineItem`] - One product entry in the cart, with its quantity
//! - [`Cart`] - The ordered collection of line items and its mutations
//!
//! ## Encoding
//!
//! Carts are stored as a JSON array of line item objects. See [`codec`].

pub mod cart;
pub mod codec;
pub mod error;
pub mod line_item;
pub mod types;

pub use cart::{AddOutcome, Cart, DecrementOutcome, ZeroQuantityPolicy};
pub use codec::{decode_cart, encode_cart};
pub use error::{CoreError, Result};
pub use line_item::{LineItem, ProductDescriptor};
pub use types::ProductId;
