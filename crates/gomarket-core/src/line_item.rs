//! Line items: a product plus the quantity held in the cart.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl ProductDescriptor {
    /// Create a descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the descriptor into a line item holding `quantity` units.
    pub fn into_line_item(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// One product entry in the cart.
///
/// Field names match the stored JSON exactly:
/// `{ "id", "title", "image_url", "price", "quantity" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    /// The descriptor part of this item, dropping the quantity.
    pub fn descriptor(&self) -> ProductDescriptor {
        ProductDescriptor {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
        }
    }
}
