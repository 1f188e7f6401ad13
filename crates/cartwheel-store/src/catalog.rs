//! Catalog lookup seam.

use crate::error::StoreResult;
use async_trait::async_trait;
use cartwheel_commerce::catalog::{Item, Promotion};
use cartwheel_commerce::ids::ItemId;

/// Read access to the catalog, plus the inventory decrement performed
/// during confirmation. Lookups are read-only and may be issued
/// concurrently; the decrement is serialized by the engine.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Resolve an item by SKU.
    async fn item_by_sku(&self, sku: &str) -> StoreResult<Option<Item>>;

    /// Resolve a batch of items by identifier.
    ///
    /// Unknown ids are simply absent from the result; callers decide
    /// whether that is an error.
    async fn items_by_ids(&self, ids: &[ItemId]) -> StoreResult<Vec<Item>>;

    /// Resolve the active promotion for an item, if any.
    ///
    /// At most one active promotion per item.
    async fn promotion_for(&self, item_id: &ItemId) -> StoreResult<Option<Promotion>>;

    /// Decrement an item's inventory by a sold amount.
    ///
    /// Fails with `InsufficientInventory` if the decrement would go
    /// negative, leaving inventory untouched.
    async fn decrement_inventory(&self, sku: &str, amount: i64) -> StoreResult<()>;
}
