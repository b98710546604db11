//! Cart: the ordered collection of line items and its state machine.
//!
//! Per line item the only transitions are:
//!
//! ```text
//! ABSENT --add--> 1 --increment--> n --decrement--> n-1 (floor 1)
//! ```
//!
//! Nothing returns an item to ABSENT. Mutations rewrite an item in place, so
//! positions are stable once an item has been appended.

use crate::error::{CoreError, Result};
use crate::line_item::{LineItem, ProductDescriptor};
use crate::types::ProductId;

/// What `add` does when the cart already holds the id with quantity 0.
///
/// Quantity 0 cannot be reached through the cart's own operations, but a
/// stored cart may contain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroQuantityPolicy {
    /// Set the existing entry back to quantity 1, in place.
    #[default]
    Revive,
    /// Append a second entry for the same id, leaving the zero entry behind.
    AppendDuplicate,
}

/// Result of adding a product to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended at `position`.
    Appended { position: usize },
    /// The existing line item now holds `quantity` units.
    Incremented { quantity: u32 },
    /// A zero-quantity entry at `position` was set back to 1.
    Revived { position: usize },
}

/// Result of decrementing a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The line item now holds `quantity` units.
    Decremented { quantity: u32 },
    /// The line item already held a single unit; nothing changed.
    AtMinimum,
}

impl DecrementOutcome {
    /// Whether the cart was modified.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Decremented { .. })
    }
}

/// An ordered sequence of line items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items, as-is.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// The line items in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all line items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Position of the first line item with this id.
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// The first line item with this id.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add one unit of a product.
    ///
    /// An existing entry with quantity > 0 is incremented; otherwise a new
    /// entry with quantity 1 is appended, unless `policy` revives a
    /// zero-quantity entry. A product with a non-finite price is rejected and
    /// the cart is left unchanged.
    pub fn add(
        &mut self,
        product: ProductDescriptor,
        policy: ZeroQuantityPolicy,
    ) -> Result<AddOutcome> {
        if !product.price.is_finite() {
            return Err(CoreError::InvalidPrice {
                id: product.id,
                price: product.price,
            });
        }

        match self.position(&product.id) {
            Some(index) if self.items[index].quantity > 0 => {
                let quantity = bump(&mut self.items[index])?;
                Ok(AddOutcome::Incremented { quantity })
            }
            Some(index) if policy == ZeroQuantityPolicy::Revive => {
                self.items[index].quantity = 1;
                Ok(AddOutcome::Revived { position: index })
            }
            _ => {
                self.items.push(product.into_line_item(1));
                Ok(AddOutcome::Appended {
                    position: self.items.len() - 1,
                })
            }
        }
    }

    /// Add one unit to an existing line item, returning the new quantity.
    ///
    /// Fails with `QuantityOverflow`, changing nothing, at `u32::MAX`.
    pub fn increment(&mut self, id: &ProductId) -> Result<u32> {
        bump(self.item_mut(id)?)
    }

    /// Remove one unit from an existing line item. Never drops below 1.
    pub fn decrement(&mut self, id: &ProductId) -> Result<DecrementOutcome> {
        let item = self.item_mut(id)?;
        if item.quantity > 1 {
            item.quantity -= 1;
            Ok(DecrementOutcome::Decremented {
                quantity: item.quantity,
            })
        } else {
            Ok(DecrementOutcome::AtMinimum)
        }
    }

    fn item_mut(&mut self, id: &ProductId) -> Result<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.clone()))
    }
}

fn bump(item: &mut LineItem) -> Result<u32> {
    item.quantity = item
        .quantity
        .checked_add(1)
        .ok_or_else(|| CoreError::QuantityOverflow(item.id.clone()))?;
    Ok(item.quantity)
}
