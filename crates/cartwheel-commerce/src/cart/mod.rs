//! Shared cart module.
//!
//! Contains cart lines (paid and bonus) and the cart aggregate that
//! enforces the merge invariant.

mod cart;
mod line;

pub use cart::Cart;
pub use line::{CartLine, LineKind};
