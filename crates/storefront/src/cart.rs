//! The shopping cart, persisted under `cart_items`.
//!
//! Cart lines snapshot the product name and unit price when they are added, so
//! the cart keeps rendering if the catalog entry later changes or disappears.
//! All operations are local: no simulated latency.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::model::{Entity, Product};
use crate::store::{keys, load_json, save_json, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: u64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

pub struct Cart<S> {
    store: S,
}

impl<S: KeyValueStore> Cart<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn items(&self) -> Result<Vec<CartItem>> {
        Ok(load_json(&self.store, keys::CART_ITEMS)?.unwrap_or_default())
    }

    fn save(&self, items: &[CartItem]) -> Result<()> {
        save_json(&self.store, keys::CART_ITEMS, items)
    }

    /// Add `quantity` of a catalog product, merging with an existing line.
    pub fn add(&self, catalog: &[Product], product_id: u64, quantity: u32) -> Result<CartItem> {
        if quantity == 0 {
            return Err(StoreError::validation("quantity", "must be at least 1"));
        }
        let product = catalog
            .iter()
            .find(|p| p.id == product_id)
            .ok_or(StoreError::NotFound {
                collection: Product::COLLECTION,
                id: product_id,
            })?;

        let mut items = self.items()?;
        let line = match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                line.clone()
            }
            None => {
                let line = CartItem {
                    product_id,
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity,
                };
                items.push(line.clone());
                line
            }
        };
        self.save(&items)?;
        debug!(product_id, quantity = line.quantity, "cart line added");
        Ok(line)
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn set_quantity(&self, product_id: u64, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove(product_id);
        }
        let mut items = self.items()?;
        let line = items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(StoreError::NotFound {
                collection: keys::CART_ITEMS,
                id: product_id,
            })?;
        line.quantity = quantity;
        self.save(&items)
    }

    /// Removing a product that is not in the cart is a no-op.
    pub fn remove(&self, product_id: u64) -> Result<()> {
        let mut items = self.items()?;
        items.retain(|i| i.product_id != product_id);
        self.save(&items)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::CART_ITEMS)
    }

    pub fn subtotal(&self) -> Result<f64> {
        Ok(self.items()?.iter().map(CartItem::line_total).sum())
    }

    /// Total number of units, not lines.
    pub fn count(&self) -> Result<u32> {
        Ok(self
            .items()?
            .iter()
            .fold(0u32, |n, i| n.saturating_add(i.quantity)))
    }
}
