//! Error types for the cart store.

use gomarket_core::{CoreError, ProductId};
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line item in the cart has this product id.
    #[error("item not found in cart: {0}")]
    ItemNotFound(ProductId),

    /// The product's price is NaN or infinite.
    #[error("invalid price for {id}: {price}")]
    InvalidPrice { id: ProductId, price: f64 },

    /// The line item already holds the maximum quantity.
    #[error("quantity limit reached for {0}")]
    QuantityOverflow(ProductId),

    /// The cart was used outside of a mounted provider.
    #[error("cart store not available: use_cart must be called within a mounted CartProvider")]
    StoreNotAvailable,

    /// The cart could not be encoded in its stored form.
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<CoreError> for CartError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::ItemNotFound(id) => CartError::ItemNotFound(id),
            CoreError::InvalidPrice { id, price } => CartError::InvalidPrice { id, price },
            CoreError::QuantityOverflow(id) => CartError::QuantityOverflow(id),
            CoreError::Encoding(msg) | CoreError::Decoding(msg) => CartError::Codec(msg),
        }
    }
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_kind() {
        let id = ProductId::new("p1");

        assert!(matches!(
            CartError::from(CoreError::ItemNotFound(id.clone())),
            CartError::ItemNotFound(_)
        ));
        assert!(matches!(
            CartError::from(CoreError::QuantityOverflow(id.clone())),
            CartError::QuantityOverflow(_)
        ));
        assert!(matches!(
            CartError::from(CoreError::InvalidPrice { id, price: f64::NAN }),
            CartError::InvalidPrice { .. }
        ));
        assert!(matches!(
            CartError::from(CoreError::Encoding("bad".into())),
            CartError::Codec(ref msg) if msg == "bad"
        ));
    }
}
