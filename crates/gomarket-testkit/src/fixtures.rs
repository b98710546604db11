//! Test fixtures and helpers.
//!
//! Common setup code for cart tests.

use gomarket_core::{encode_cart, LineItem, ProductDescriptor};
use gomarket_store::MemoryStore;

/// Key the cart is stored under by default.
pub const STORAGE_KEY: &str = "@GoMarket:products";

/// The shirt used throughout the scenarios: id `p1`, price 10.
pub fn shirt() -> ProductDescriptor {
    ProductDescriptor::new("p1", "Shirt", "https://img.gomarket.test/p1.png", 10.0)
}

/// A small catalog of distinct products.
pub fn catalog() -> Vec<ProductDescriptor> {
    vec![
        shirt(),
        ProductDescriptor::new("p2", "Mug", "https://img.gomarket.test/p2.png", 6.5),
        ProductDescriptor::new("p3", "Cap", "https://img.gomarket.test/p3.png", 12.0),
        ProductDescriptor::new("p4", "Socks", "https://img.gomarket.test/p4.png", 3.99),
    ]
}

/// A memory store holding `items` under the default key.
pub fn stored_cart(items: &[LineItem]) -> MemoryStore {
    let raw = encode_cart(items).unwrap_or_else(|_| "[]".to_owned());
    stored_raw(&raw)
}

/// A memory store holding a raw value under the default key.
pub fn stored_raw(raw: &str) -> MemoryStore {
    MemoryStore::with_entry(STORAGE_KEY, raw)
}
