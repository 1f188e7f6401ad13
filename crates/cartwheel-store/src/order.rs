//! Order persistence seam.

use crate::error::StoreResult;
use async_trait::async_trait;
use cartwheel_commerce::ids::{CartId, OrderId};
use cartwheel_commerce::order::{NewOrder, NewOrderLine, Order, OrderLine};
use serde::{Deserialize, Serialize};

/// The atomic persistence payload of one confirmation.
///
/// Everything ConfirmOrder writes travels in one value so a backend can
/// span it with a single transaction: the order draft, its detail lines
/// in computed order, the per-SKU inventory decrements, and the cart to
/// clear. Either all of it commits or none of it does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutCommit {
    /// The cart being converted; cleared on commit.
    pub cart_id: CartId,
    /// The order draft (total already summed).
    pub order: NewOrder,
    /// Detail lines in the order they were computed.
    pub lines: Vec<NewOrderLine>,
    /// Inventory decrements as (SKU, quantity) pairs, one per detail
    /// line.
    pub decrements: Vec<(String, i64)>,
}

/// Persistence for confirmed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create an order row, returning it with its assigned identifier.
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order>;

    /// Create one detail line under an existing order.
    async fn create_detail_line(
        &self,
        order_id: &OrderId,
        line: NewOrderLine,
    ) -> StoreResult<OrderLine>;

    /// Read the detail lines of an order, in insertion order.
    async fn detail_lines(&self, order_id: &OrderId) -> StoreResult<Vec<OrderLine>>;

    /// Atomically persist one confirmation: order, detail lines,
    /// inventory decrements, cart clear. A failure (e.g. a decrement
    /// that would go negative) must leave no partial state.
    async fn commit_checkout(&self, commit: CheckoutCommit) -> StoreResult<Order>;
}
