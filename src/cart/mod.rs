//! Shopping cart aggregate
//!
//! A cart is an ordered list of line items plus two derived fields, the total
//! price and the total item count. Every mutating operation ends by
//! recomputing both from the item list, so they can never drift.
//!
//! None of the operations fail. Unknown ids are no-ops and negative quantities
//! are clamped to zero, which removes the item.

mod store;

pub use store::CartStore;

use serde::{Deserialize, Serialize};

/// Product identifier as issued by the product API
pub type ProductId = u64;

/// Image reference used when a product has no images
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// The subset of a product the cart needs when adding it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One product's entry in the cart
///
/// Title, price and image are copied at add time and are not re-synced if the
/// product changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub unit_price: f64,
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line (unit price times quantity)
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A cart mutation, as dispatched by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add(ProductSnapshot),
    Remove(ProductId),
    SetQuantity { id: ProductId, quantity: i64 },
    Clear,
}

/// Cart contents and derived totals
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CartState {
    items: Vec<LineItem>,
    total: f64,
    item_count: u64,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add one unit of a product, using [`PLACEHOLDER_IMAGE`] if it has no images
    pub fn add(&mut self, product: &ProductSnapshot) {
        self.add_with_placeholder(product, PLACEHOLDER_IMAGE);
    }

    /// Add one unit of a product with an explicit placeholder image reference
    pub fn add_with_placeholder(&mut self, product: &ProductSnapshot, placeholder: &str) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            let image = product
                .images
                .first()
                .filter(|image| !image.is_empty())
                .cloned()
                .unwrap_or_else(|| placeholder.to_string());

            self.items.push(LineItem {
                id: product.id,
                title: product.title.clone(),
                unit_price: product.price,
                image,
                quantity: 1,
            });
        }

        self.recalculate();
    }

    /// Remove a line item; no-op if the id is not in the cart
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
        self.recalculate();
    }

    /// Set the quantity of a line item, clamping negatives to zero
    ///
    /// A resulting quantity of zero removes the item. No-op if the id is not
    /// in the cart.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) {
        let clamped = quantity.clamp(0, i64::from(u32::MAX)) as u32;

        if clamped == 0 {
            self.items.retain(|item| item.id != id);
        } else if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = clamped;
        }

        self.recalculate();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.total = 0.0;
        self.item_count = 0;
    }

    /// Compute the state that results from applying `action` to this one
    pub fn apply(&self, action: &CartAction, placeholder: &str) -> CartState {
        let mut next = self.clone();
        match action {
            CartAction::Add(product) => next.add_with_placeholder(product, placeholder),
            CartAction::Remove(id) => next.remove(*id),
            CartAction::SetQuantity { id, quantity } => next.set_quantity(*id, *quantity),
            CartAction::Clear => next.clear(),
        }
        next
    }

    fn recalculate(&mut self) {
        self.item_count = self
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();
        self.total = self
            .items
            .iter()
            .fold(0.0, |total, item| total + item.line_total());
    }
}
