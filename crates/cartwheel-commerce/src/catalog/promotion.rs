//! Promotion rules.
//!
//! A promotion is a closed rule variant dispatched by pattern match, not
//! by string comparison: the rule family and its parameters travel
//! together, so a typo in a kind label cannot silently disable pricing.

use crate::error::CommerceError;
use crate::ids::{ItemId, PromotionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The rule family applied to a line, as recorded on detail lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// Buy-N-get-one-style free units.
    FreeItems,
    /// Every N-th group of units at a special price.
    BonusPrice,
    /// Flat multiplicative discount once the threshold is met.
    DiscountItems,
}

impl PromotionKind {
    /// Wire label for this kind (e.g., "free_items").
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionKind::FreeItems => "free_items",
            PromotionKind::BonusPrice => "bonus_price",
            PromotionKind::DiscountItems => "discount_items",
        }
    }
}

impl fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A promotion rule with its parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromotionRule {
    /// One free unit per `requirement` paid units.
    FreeItems {
        /// Paid units needed per free unit.
        requirement: i64,
    },
    /// Each full group of `requirement` units is charged `price` instead
    /// of the per-unit total.
    BonusPrice {
        /// Units per specially-priced group.
        requirement: i64,
        /// Price charged per full group.
        price: Money,
    },
    /// The whole line is multiplied by `factor` once the threshold is met.
    DiscountItems {
        /// Quantity at which the discount activates.
        requirement: i64,
        /// Multiplicative factor in `[0, 1]`.
        factor: f64,
    },
}

impl PromotionRule {
    /// Create a free-items rule.
    pub fn free_items(requirement: i64) -> Self {
        PromotionRule::FreeItems { requirement }
    }

    /// Create a bonus-price rule.
    pub fn bonus_price(requirement: i64, price: Money) -> Self {
        PromotionRule::BonusPrice { requirement, price }
    }

    /// Create a discount rule.
    pub fn discount_items(requirement: i64, factor: f64) -> Self {
        PromotionRule::DiscountItems {
            requirement,
            factor,
        }
    }

    /// The quantity requirement that triggers this rule.
    pub fn requirement(&self) -> i64 {
        match self {
            PromotionRule::FreeItems { requirement }
            | PromotionRule::BonusPrice { requirement, .. }
            | PromotionRule::DiscountItems { requirement, .. } => *requirement,
        }
    }

    /// The kind label recorded on detail lines for this rule.
    pub fn kind(&self) -> PromotionKind {
        match self {
            PromotionRule::FreeItems { .. } => PromotionKind::FreeItems,
            PromotionRule::BonusPrice { .. } => PromotionKind::BonusPrice,
            PromotionRule::DiscountItems { .. } => PromotionKind::DiscountItems,
        }
    }

    /// Validate rule parameters against catalog constraints.
    ///
    /// A zero or negative quantity requirement would divide by zero during
    /// evaluation; a discount factor outside `[0, 1]` or a negative bonus
    /// price would produce negative prices. Checked at construction and
    /// again by the evaluator, since rules also arrive deserialized from
    /// storage.
    pub fn validate(&self, item_id: &ItemId) -> Result<(), CommerceError> {
        let invalid = |reason: &str| CommerceError::InvalidPromotion {
            item_id: item_id.as_str().to_string(),
            reason: reason.to_string(),
        };

        if self.requirement() < 1 {
            return Err(invalid("quantity requirement must be at least 1"));
        }
        match self {
            PromotionRule::DiscountItems { factor, .. } => {
                if !(0.0..=1.0).contains(factor) {
                    return Err(invalid("discount factor must be in [0, 1]"));
                }
            }
            PromotionRule::BonusPrice { price, .. } => {
                if price.is_negative() {
                    return Err(invalid("bonus price must not be negative"));
                }
            }
            PromotionRule::FreeItems { .. } => {}
        }
        Ok(())
    }
}

/// An active promotion targeting one catalog item.
///
/// At most one active promotion per item; catalog lookup returns either
/// one promotion or none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    /// Unique promotion identifier.
    pub id: PromotionId,
    /// The item this promotion targets.
    pub item_id: ItemId,
    /// The rule applied to lines of that item.
    pub rule: PromotionRule,
}

impl Promotion {
    /// Create a promotion, validating its rule parameters.
    pub fn new(item_id: ItemId, rule: PromotionRule) -> Result<Self, CommerceError> {
        rule.validate(&item_id)?;
        Ok(Self {
            id: PromotionId::generate(),
            item_id,
            rule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_kind_labels() {
        assert_eq!(PromotionKind::FreeItems.as_str(), "free_items");
        assert_eq!(PromotionKind::BonusPrice.as_str(), "bonus_price");
        assert_eq!(PromotionKind::DiscountItems.as_str(), "discount_items");
    }

    #[test]
    fn test_zero_requirement_rejected() {
        let result = Promotion::new(ItemId::new("item-1"), PromotionRule::free_items(0));
        assert!(matches!(
            result,
            Err(CommerceError::InvalidPromotion { .. })
        ));
    }

    #[test]
    fn test_factor_out_of_range_rejected() {
        let result = Promotion::new(
            ItemId::new("item-1"),
            PromotionRule::discount_items(2, 1.5),
        );
        assert!(matches!(
            result,
            Err(CommerceError::InvalidPromotion { .. })
        ));
    }

    #[test]
    fn test_negative_bonus_price_rejected() {
        let result = Promotion::new(
            ItemId::new("item-1"),
            PromotionRule::bonus_price(5, Money::new(-100, Currency::USD)),
        );
        assert!(matches!(
            result,
            Err(CommerceError::InvalidPromotion { .. })
        ));
    }

    #[test]
    fn test_rule_serializes_with_kind_tag() {
        let rule = PromotionRule::discount_items(3, 0.9);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["kind"], "discount_items");
        assert_eq!(json["requirement"], 3);

        let kind = serde_json::to_value(PromotionKind::FreeItems).unwrap();
        assert_eq!(kind, "free_items");
    }

    #[test]
    fn test_valid_promotion() {
        let promo = Promotion::new(
            ItemId::new("item-1"),
            PromotionRule::bonus_price(5, Money::from_major(8, Currency::USD)),
        )
        .unwrap();
        assert_eq!(promo.rule.requirement(), 5);
        assert_eq!(promo.rule.kind(), PromotionKind::BonusPrice);
    }
}
