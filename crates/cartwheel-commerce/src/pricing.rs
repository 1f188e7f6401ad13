//! Promotion evaluator.
//!
//! Pure pricing: a paid cart line plus its resolved promotion and catalog
//! price yields a priced detail line and, for `free_items`, a count of
//! bonus units to fold back into the cart. Bonus units for the same item
//! accumulate across the whole cart (`BonusTally`) before a single
//! zero-price detail line is emitted per item.

use crate::catalog::{Item, Promotion, PromotionKind, PromotionRule};
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::Money;
use crate::order::NewOrderLine;

/// Result of evaluating one paid cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEvaluation {
    /// The priced detail line for the paid units.
    pub detail: NewOrderLine,
    /// Free units granted for this line's item, to be accumulated across
    /// the cart. Zero unless the rule is `free_items`.
    pub bonus_units: i64,
}

/// Evaluate one paid cart line against its promotion.
///
/// Pricing rules:
/// - no promotion: price = `unit * quantity`, no kind recorded
/// - `free_items` with requirement `n`: `quantity / n` bonus units; the
///   paid units are priced normally and carry no kind (the kind appears
///   on the separate zero-price bonus line)
/// - `bonus_price` with requirement `n` and group price `b`: price =
///   `unit * (quantity % n) + b * (quantity / n)`; the kind is recorded
///   only once the threshold is met
/// - `discount_items` with requirement `n` and factor `f`: price =
///   `unit * quantity * f` once `quantity >= n`, base price otherwise;
///   the kind is recorded only when the discount applied
pub fn evaluate_line(
    item: &Item,
    quantity: i64,
    promotion: Option<&Promotion>,
) -> Result<LineEvaluation, CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }

    let base = item
        .unit_price
        .try_multiply(quantity)
        .ok_or(CommerceError::Overflow)?;

    let (price, kind, bonus_units) = match promotion {
        None => (base, None, 0),
        Some(promo) => {
            if promo.item_id != item.id {
                return Err(CommerceError::InvalidPromotion {
                    item_id: item.id.as_str().to_string(),
                    reason: format!("promotion targets item {}", promo.item_id),
                });
            }
            promo.rule.validate(&item.id)?;

            match &promo.rule {
                PromotionRule::FreeItems { requirement } => {
                    (base, None, quantity / requirement)
                }
                PromotionRule::BonusPrice { requirement, price } => {
                    let groups = quantity / requirement;
                    let remainder = quantity % requirement;
                    let total = item
                        .unit_price
                        .try_multiply(remainder)
                        .and_then(|paid| {
                            price.try_multiply(groups).and_then(|b| paid.try_add(&b))
                        })
                        .ok_or(CommerceError::Overflow)?;
                    let kind = (quantity >= *requirement).then_some(PromotionKind::BonusPrice);
                    (total, kind, 0)
                }
                PromotionRule::DiscountItems {
                    requirement,
                    factor,
                } => {
                    if quantity >= *requirement {
                        (base.multiply_factor(*factor), Some(PromotionKind::DiscountItems), 0)
                    } else {
                        (base, None, 0)
                    }
                }
            }
        }
    };

    Ok(LineEvaluation {
        detail: NewOrderLine {
            sku: item.sku.clone(),
            name: item.name.clone(),
            price,
            quantity,
            promotion: kind,
        },
        bonus_units,
    })
}

/// Build the zero-price detail line for an item's accumulated bonus units.
pub fn bonus_detail(item: &Item, units: i64) -> NewOrderLine {
    NewOrderLine {
        sku: item.sku.clone(),
        name: item.name.clone(),
        price: Money::zero(item.unit_price.currency),
        quantity: units,
        promotion: Some(PromotionKind::FreeItems),
    }
}

/// Accumulates `free_items` bonus units per target item, in the order
/// items are first seen across the cart.
#[derive(Debug, Clone, Default)]
pub struct BonusTally {
    entries: Vec<(ItemId, i64)>,
}

impl BonusTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate bonus units for an item. Non-positive counts are
    /// ignored.
    pub fn add(&mut self, item_id: ItemId, units: i64) {
        if units <= 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| id == &item_id) {
            entry.1 += units;
        } else {
            self.entries.push((item_id, units));
        }
    }

    /// Whether any bonus units were accumulated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate accumulated (item, units) pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, i64)> {
        self.entries.iter().map(|(id, units)| (id, *units))
    }

    /// Consume the tally, yielding (item, units) pairs in first-seen
    /// order.
    pub fn into_entries(self) -> Vec<(ItemId, i64)> {
        self.entries
    }
}
