//! Cart aggregate.

use crate::cart::{CartLine, LineKind};
use crate::error::CommerceError;
use crate::ids::{CartId, ItemId, LineId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The cart for one key, owning its lines.
///
/// Keyed by `CartId` (session or user); the engine never operates on
/// process-wide shared cart state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// The key this cart belongs to.
    pub id: CartId,
    /// Lines in the cart.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
        }
    }

    /// Rebuild a cart from persisted lines.
    pub fn from_lines(id: CartId, lines: Vec<CartLine>) -> Self {
        Self { id, lines }
    }

    /// All lines, paid and bonus.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, yielding its lines for persistence.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Iterate over the paid lines only.
    pub fn paid_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| !l.is_bonus())
    }

    /// The paid line for an item, if present.
    pub fn paid_line(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|l| !l.is_bonus() && &l.item_id == item_id)
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity held for an item across paid and bonus lines.
    ///
    /// This is what inventory validation compares against stock.
    pub fn total_quantity_for(&self, item_id: &ItemId) -> i64 {
        self.lines
            .iter()
            .filter(|l| &l.item_id == item_id)
            .map(|l| l.quantity)
            .sum()
    }

    /// Merge a quantity into the paid line for an item, appending a new
    /// line if none exists. Returns the post-merge paid line.
    pub fn merge_paid(
        &mut self,
        item_id: ItemId,
        quantity: i64,
    ) -> Result<&CartLine, CommerceError> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| !l.is_bonus() && l.item_id == item_id)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            line.touch();
        } else {
            self.lines.push(CartLine::paid(item_id.clone(), quantity));
        }
        // The line we just mutated or pushed is guaranteed present.
        self.paid_line(&item_id)
            .ok_or_else(|| CommerceError::ItemNotFound(item_id.as_str().to_string()))
    }

    /// Replace the cart's bonus lines wholesale with accumulated totals.
    ///
    /// Existing bonus lines keep their store-assigned ids so persistence
    /// can update them in place; items no longer earning a bonus lose
    /// their bonus line; zero totals never produce a line.
    pub fn apply_bonuses(&mut self, bonuses: impl IntoIterator<Item = (ItemId, i64)>) {
        let existing_ids: HashMap<ItemId, LineId> = self
            .lines
            .iter()
            .filter(|l| l.is_bonus())
            .filter_map(|l| l.id.clone().map(|id| (l.item_id.clone(), id)))
            .collect();

        self.lines.retain(|l| l.kind == LineKind::Paid);

        for (item_id, quantity) in bonuses {
            if quantity <= 0 {
                continue;
            }
            let mut line = CartLine::bonus(item_id.clone(), quantity);
            line.id = existing_ids.get(&item_id).cloned();
            self.lines.push(line);
        }
    }
}
