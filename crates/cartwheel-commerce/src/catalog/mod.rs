//! Catalog module.
//!
//! Contains items (price + inventory) and promotion rules.

mod item;
mod promotion;

pub use item::Item;
pub use promotion::{Promotion, PromotionKind, PromotionRule};
