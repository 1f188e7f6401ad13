//! Cart persistence seam.

use crate::error::StoreResult;
use async_trait::async_trait;
use cartwheel_commerce::cart::CartLine;
use cartwheel_commerce::ids::CartId;

/// Persistence for the per-key shared cart.
///
/// The consolidator persists the whole mutated cart through
/// `replace_all` so bonus folding never leaves half-written state; the
/// single-line operations exist for delivery-layer CRUD.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Read all lines of a cart. An unknown cart reads as empty.
    async fn lines(&self, cart_id: &CartId) -> StoreResult<Vec<CartLine>>;

    /// Create one line, returning it with its assigned identifier.
    async fn create_line(&self, cart_id: &CartId, line: CartLine) -> StoreResult<CartLine>;

    /// Update one existing line, matched by identifier.
    async fn update_line(&self, cart_id: &CartId, line: CartLine) -> StoreResult<CartLine>;

    /// Atomically replace the cart's lines, returning them with
    /// identifiers assigned.
    async fn replace_all(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLine>,
    ) -> StoreResult<Vec<CartLine>>;

    /// Remove every line of a cart.
    async fn clear(&self, cart_id: &CartId) -> StoreResult<()>;
}
