//! Storage seams and in-memory backend for Cartwheel.
//!
//! The engine consumes three async traits ([`CatalogStore`],
//! [`CartStore`], [`OrderStore`]) and never talks to a database
//! directly. Confirmation persists through a single
//! [`CheckoutCommit`] so a backend can map the whole sequence (order,
//! detail lines, inventory decrements, cart clear) onto one transaction.
//!
//! [`MemoryStore`] implements all three traits over one locked state and
//! is used by tests and demos.

mod cart;
mod catalog;
mod error;
mod memory;
mod order;

pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use order::{CheckoutCommit, OrderStore};
