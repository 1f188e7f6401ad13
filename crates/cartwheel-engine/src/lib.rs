//! Cart consolidation and order confirmation engine.
//!
//! [`OrderService`] exposes the two public operations of the backend:
//!
//! - `add_to_cart`: merge an incoming (SKU, quantity) into a keyed
//!   cart, re-fold promotion-granted bonus lines across the whole cart,
//!   validate against inventory, persist
//! - `confirm_order`: price the cart's lines through the promotion
//!   evaluator, sum the order total, and commit order + detail lines +
//!   inventory decrements + cart clear atomically
//!
//! Each call runs under a bounded timeout ([`EngineConfig`]); mutating
//! calls are serialized so no two confirmations can act on the same cart
//! snapshot.

mod config;
mod service;

pub use config::EngineConfig;
pub use service::OrderService;
