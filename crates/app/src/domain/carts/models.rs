//! Cart Models

use crate::domain::products::records::{ProductId, ProductRecord};

/// Cart Model
///
/// Prices are display snapshots taken when a line is added; checkout reprices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total: u64,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, product: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product)
    }

    /// Quantity already held for `product`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.item(product).map_or(0, |item| item.quantity)
    }

    /// Add `quantity` of `product`, merging into an existing line.
    pub fn add(&mut self, product: &ProductRecord, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.image_url.clone(),
                quantity,
            });
        }

        self.recalculate();
    }

    /// Replace the quantity of an existing line. Returns `false` when absent.
    pub fn set_quantity(&mut self, product: ProductId, quantity: u32) -> bool {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product)
        else {
            return false;
        };

        item.quantity = quantity;

        self.recalculate();

        true
    }

    /// Drop the line for `product`. Returns `false` when absent.
    pub fn remove(&mut self, product: ProductId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.product_id != product);

        let removed = self.items.len() != before;

        if removed {
            self.recalculate();
        }

        removed
    }

    fn recalculate(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(0_u64, |total, item| total.saturating_add(item.subtotal()));
    }
}
