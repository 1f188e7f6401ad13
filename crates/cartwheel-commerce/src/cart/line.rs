//! Cart line types.

use crate::ids::{ItemId, LineId};
use serde::{Deserialize, Serialize};

/// Whether a cart line holds purchased units or promotion-granted ones.
///
/// Free units must stay distinguishable from paid units in the cart:
/// otherwise confirmation would price them like any other line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Units the customer pays for.
    Paid,
    /// Free units granted by a `free_items` promotion.
    Bonus,
}

/// One (item, quantity) pair held in a cart.
///
/// At rest a cart holds at most one paid line and at most one bonus line
/// per item; the consolidator enforces this by merging on add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Identifier assigned by the store; `None` until first persisted.
    pub id: Option<LineId>,
    /// The item this line references.
    pub item_id: ItemId,
    /// Quantity, always positive for persisted lines.
    pub quantity: i64,
    /// Paid or bonus.
    pub kind: LineKind,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl CartLine {
    /// Create a fresh paid line.
    pub fn paid(item_id: ItemId, quantity: i64) -> Self {
        Self::new(item_id, quantity, LineKind::Paid)
    }

    /// Create a fresh bonus line.
    pub fn bonus(item_id: ItemId, quantity: i64) -> Self {
        Self::new(item_id, quantity, LineKind::Bonus)
    }

    fn new(item_id: ItemId, quantity: i64, kind: LineKind) -> Self {
        let now = current_timestamp();
        Self {
            id: None,
            item_id,
            quantity,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this line holds promotion-granted units.
    pub fn is_bonus(&self) -> bool {
        self.kind == LineKind::Bonus
    }

    /// Mark the line as mutated.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kinds() {
        let paid = CartLine::paid(ItemId::new("item-1"), 3);
        let bonus = CartLine::bonus(ItemId::new("item-1"), 1);
        assert!(!paid.is_bonus());
        assert!(bonus.is_bonus());
        assert!(paid.id.is_none());
    }
}
