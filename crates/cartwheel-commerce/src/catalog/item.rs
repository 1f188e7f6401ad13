//! Catalog item type.

use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A sellable catalog item.
///
/// Owned by the catalog; the only mutation the engine performs is the
/// inventory decrement during order confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Stock keeping unit (unique, human-facing).
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Available inventory quantity.
    pub inventory: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Item {
    /// Create a new catalog item.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        inventory: i64,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ItemId::generate(),
            sku: sku.into(),
            name: name.into(),
            unit_price,
            inventory,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a specific quantity can be fulfilled from inventory.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.inventory >= quantity
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.inventory <= 0
    }

    /// Decrement inventory by a sold quantity.
    ///
    /// Returns `false` (and leaves inventory untouched) if the decrement
    /// would go negative.
    pub fn decrement(&mut self, quantity: i64) -> bool {
        if !self.can_fulfill(quantity) {
            return false;
        }
        self.inventory -= quantity;
        self.updated_at = current_timestamp();
        true
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
