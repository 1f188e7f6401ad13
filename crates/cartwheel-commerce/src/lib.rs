//! Commerce domain types and promotion pricing for Cartwheel.
//!
//! This crate provides the pure domain layer of the order-taking backend:
//!
//! - **Catalog**: items with prices and inventory, promotion rules
//! - **Cart**: cart lines (paid and bonus) and the cart aggregate
//! - **Pricing**: the promotion evaluator that turns cart lines into
//!   priced detail lines and free-unit bonuses
//! - **Order**: confirmed orders and their immutable detail lines
//!
//! Nothing here touches storage; persistence seams live in
//! `cartwheel-store` and orchestration in `cartwheel-engine`.
//!
//! # Example
//!
//! ```
//! use cartwheel_commerce::prelude::*;
//!
//! let item = Item::new("SKU-2", "Chromecast", Money::from_major(5, Currency::USD), 50);
//! let promo = Promotion::new(item.id.clone(), PromotionRule::free_items(3)).unwrap();
//!
//! let eval = evaluate_line(&item, 7, Some(&promo)).unwrap();
//! assert_eq!(eval.detail.price, Money::from_major(35, Currency::USD));
//! assert_eq!(eval.bonus_units, 2);
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;
pub mod pricing;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Item, Promotion, PromotionKind, PromotionRule};

    // Cart
    pub use crate::cart::{Cart, CartLine, LineKind};

    // Pricing
    pub use crate::pricing::{bonus_detail, evaluate_line, BonusTally, LineEvaluation};

    // Order
    pub use crate::order::{NewOrder, NewOrderLine, Order, OrderLine};
}
