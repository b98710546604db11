//! JSON encoding of a cart for key-value storage.
//!
//! The stored value is a JSON array of line item objects:
//!
//! ```json
//! [{"id":"p1","title":"Shirt","image_url":"https://...","price":10.0,"quantity":2}]
//! ```
//!
//! There is no version field; the format is the array itself.

use crate::error::{CoreError, Result};
use crate::line_item::LineItem;

/// Encode line items as the stored JSON array.
///
/// Fails on a non-finite price, which `serde_json` would write as `null`
/// and [`decode_cart`] could not read back.
pub fn encode_cart(items: &[LineItem]) -> Result<String> {
    if let Some(item) = items.iter().find(|item| !item.price.is_finite()) {
        return Err(CoreError::Encoding(format!(
            "price of {} is not a finite number: {}",
            item.id, item.price
        )));
    }
    serde_json::to_string(items).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Decode the stored JSON array into line items.
pub fn decode_cart(raw: &str) -> Result<Vec<LineItem>> {
    serde_json::from_str(raw).map_err(|e| CoreError::Decoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::ProductDescriptor;

    #[test]
    fn test_field_names_match_stored_format() {
        let items = vec![ProductDescriptor::new("p1", "Shirt", "https://img/p1.png", 10.5)
            .into_line_item(2)];

        let json = encode_cart(&items).unwrap();

        assert_eq!(
            json,
            r#"[{"id":"p1","title":"Shirt","image_url":"https://img/p1.png","price":10.5,"quantity":2}]"#
        );
    }

    #[test]
    fn test_decode_integer_price() {
        let raw = r#"[{"id":"p1","title":"Shirt","image_url":"","price":10,"quantity":1}]"#;
        let items = decode_cart(raw).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 10.0);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_cart("{not json"), Err(CoreError::Decoding(_))));
        assert!(matches!(decode_cart("\"\""), Err(CoreError::Decoding(_))));
        // Quantities are unsigned integers.
        assert!(decode_cart(r#"[{"id":"p1","title":"","image_url":"","price":1,"quantity":-1}]"#).is_err());
    }

    #[test]
    fn test_non_finite_price_does_not_encode() {
        let good = ProductDescriptor::new("p1", "Shirt", "", 10.0).into_line_item(1);
        let bad = ProductDescriptor::new("p2", "Broken", "", f64::NAN).into_line_item(1);

        let err = encode_cart(&[good, bad]).unwrap_err();
        assert!(matches!(err, CoreError::Encoding(ref msg) if msg.contains("p2")));

        let inf = ProductDescriptor::new("p3", "Huge", "", f64::INFINITY).into_line_item(1);
        assert!(encode_cart(&[inf]).is_err());
    }

    #[test]
    fn test_empty_cart_encodes_as_empty_array() {
        assert_eq!(encode_cart(&[]).unwrap(), "[]");
        assert!(decode_cart("[]").unwrap().is_empty());
    }
}
