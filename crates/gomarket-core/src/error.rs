//! Error types for GoMarket Core.

use thiserror::Error;

use crate::types::ProductId;

/// Errors raised by cart operations and the storage codec.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line item in the cart has this product id.
    #[error("item not found in cart: {0}")]
    ItemNotFound(ProductId),

    /// Prices must be finite; JSON has no encoding for NaN or infinity.
    #[error("invalid price for {id}: {price}")]
    InvalidPrice { id: ProductId, price: f64 },

    /// The line item already holds `u32::MAX` units.
    #[error("quantity limit reached for {0}")]
    QuantityOverflow(ProductId),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
