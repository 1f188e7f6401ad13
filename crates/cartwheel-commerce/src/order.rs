//! Order types.
//!
//! An order exclusively owns its detail lines; both are immutable once
//! created by confirmation.

use crate::catalog::PromotionKind;
use crate::ids::{OrderId, OrderLineId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier, assigned by the store.
    pub id: OrderId,
    /// Total price, equal to the sum of the detail-line prices.
    pub total_price: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

/// One priced, persisted detail line belonging to a confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Unique line identifier, assigned by the store.
    pub id: OrderLineId,
    /// The owning order.
    pub order_id: OrderId,
    /// SKU, denormalized for display.
    pub sku: String,
    /// Item name, denormalized for display.
    pub name: String,
    /// Computed price for the whole line.
    pub price: Money,
    /// Quantity on this line.
    pub quantity: i64,
    /// The promotion kind applied, if any.
    pub promotion: Option<PromotionKind>,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl OrderLine {
    /// The promotion label as recorded for delivery layers; empty when no
    /// promotion applied.
    pub fn promotion_label(&self) -> &'static str {
        self.promotion.map(|k| k.as_str()).unwrap_or("")
    }
}

/// An order draft, before the store assigns its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    /// Total price of the drafted order.
    pub total_price: Money,
}

/// A detail-line draft, before the store assigns identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderLine {
    /// SKU, denormalized for display.
    pub sku: String,
    /// Item name, denormalized for display.
    pub name: String,
    /// Computed price for the whole line.
    pub price: Money,
    /// Quantity on this line.
    pub quantity: i64,
    /// The promotion kind applied, if any.
    pub promotion: Option<PromotionKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_promotion_label() {
        let line = OrderLine {
            id: OrderLineId::new("line-1"),
            order_id: OrderId::new("order-1"),
            sku: "SKU-2".to_string(),
            name: "Chromecast".to_string(),
            price: Money::zero(Currency::USD),
            quantity: 2,
            promotion: Some(PromotionKind::FreeItems),
            created_at: 0,
        };
        assert_eq!(line.promotion_label(), "free_items");

        let line = OrderLine {
            promotion: None,
            ..line
        };
        assert_eq!(line.promotion_label(), "");
    }
}
