//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use gomarket_core::{Cart, LineItem, ProductDescriptor, ProductId, ZeroQuantityPolicy};

/// Generate a product id from a small pool, so operations collide often.
pub fn pooled_product_id() -> impl Strategy<Value = ProductId> {
    (0u8..6).prop_map(|n| ProductId::new(format!("p{}", n)))
}

/// Generate an arbitrary product id.
pub fn product_id() -> impl Strategy<Value = ProductId> {
    "[a-zA-Z0-9:_-]{1,24}".prop_map(ProductId::new)
}

/// Generate a finite, non-negative price with cent precision.
pub fn price() -> impl Strategy<Value = f64> {
    (0u32..1_000_000).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generate a product descriptor with the given id strategy.
pub fn product_descriptor_with(
    id: impl Strategy<Value = ProductId>,
) -> impl Strategy<Value = ProductDescriptor> {
    (id, "[ -~]{0,32}", "(https://[a-z]{1,12}\\.test/[a-z0-9]{1,8}\\.png)?", price())
        .prop_map(|(id, title, image_url, price)| ProductDescriptor {
            id,
            title,
            image_url,
            price,
        })
}

/// Generate a product descriptor.
pub fn product_descriptor() -> impl Strategy<Value = ProductDescriptor> {
    product_descriptor_with(product_id())
}

/// Generate a line item with quantity >= 1.
pub fn line_item() -> impl Strategy<Value = LineItem> {
    (product_descriptor(), 1u32..1_000).prop_map(|(product, qty)| product.into_line_item(qty))
}

/// Generate a non-empty cart with unique ids, in insertion order.
pub fn stored_items(max_len: usize) -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item(), 1..=max_len.max(1)).prop_map(|items| {
        let mut seen = BTreeMap::new();
        items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone(), ()).is_none())
            .collect()
    })
}

/// A single cart operation.
#[derive(Debug, Clone)]
pub enum CartOp {
    Add(ProductDescriptor),
    Increment(ProductId),
    Decrement(ProductId),
}

/// Generate a cart operation over the pooled ids.
pub fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        product_descriptor_with(pooled_product_id()).prop_map(CartOp::Add),
        pooled_product_id().prop_map(CartOp::Increment),
        pooled_product_id().prop_map(CartOp::Decrement),
    ]
}

/// Generate a sequence of up to `max_len` cart operations.
pub fn cart_ops(max_len: usize) -> impl Strategy<Value = Vec<CartOp>> {
    prop::collection::vec(cart_op(), 0..=max_len)
}

/// Apply an operation to a cart, ignoring lookup misses.
///
/// Returns whether the operation was accepted.
pub fn apply_op(cart: &mut Cart, op: &CartOp) -> bool {
    match op {
        CartOp::Add(product) => {
            cart.add(product.clone(), ZeroQuantityPolicy::Revive).is_ok()
        }
        CartOp::Increment(id) => cart.increment(id).is_ok(),
        CartOp::Decrement(id) => cart.decrement(id).is_ok(),
    }
}
