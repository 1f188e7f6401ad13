//! In-memory backend.
//!
//! Implements all three storage seams over one locked state map, which
//! makes `commit_checkout` genuinely all-or-nothing: every decrement is
//! validated before anything is applied, under a single write guard.
//! Used by tests and demos; a SQL backend would hold the same contract
//! with a database transaction.

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::error::{StoreError, StoreResult};
use crate::order::{CheckoutCommit, OrderStore};
use async_trait::async_trait;
use cartwheel_commerce::cart::CartLine;
use cartwheel_commerce::catalog::{Item, Promotion};
use cartwheel_commerce::ids::{CartId, ItemId, LineId, OrderId, OrderLineId};
use cartwheel_commerce::order::{NewOrder, NewOrderLine, Order, OrderLine};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct State {
    items: Vec<Item>,
    promotions: HashMap<ItemId, Promotion>,
    carts: HashMap<CartId, Vec<CartLine>>,
    orders: Vec<Order>,
    order_lines: Vec<OrderLine>,
}

/// In-memory store holding catalog, carts, and orders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog item.
    pub fn insert_item(&self, item: Item) -> StoreResult<()> {
        self.write()?.items.push(item);
        Ok(())
    }

    /// Seed a promotion for its target item.
    pub fn insert_promotion(&self, promotion: Promotion) -> StoreResult<()> {
        self.write()?
            .promotions
            .insert(promotion.item_id.clone(), promotion);
        Ok(())
    }

    /// Number of persisted orders, for test assertions.
    pub fn order_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.orders.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::backend("state lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::backend("state lock poisoned"))
    }
}

fn with_line_id(mut line: CartLine) -> CartLine {
    if line.id.is_none() {
        line.id = Some(LineId::generate());
    }
    line
}

/// Validate every aggregated decrement before applying any of them.
fn apply_decrements(state: &mut State, decrements: &[(String, i64)]) -> StoreResult<()> {
    let mut per_sku: Vec<(String, i64)> = Vec::new();
    for (sku, amount) in decrements {
        if let Some(entry) = per_sku.iter_mut().find(|(s, _)| s == sku) {
            entry.1 += amount;
        } else {
            per_sku.push((sku.clone(), *amount));
        }
    }

    for (sku, amount) in &per_sku {
        let item = state
            .items
            .iter()
            .find(|i| &i.sku == sku)
            .ok_or_else(|| StoreError::NotFound(format!("item {sku}")))?;
        if !item.can_fulfill(*amount) {
            return Err(StoreError::InsufficientInventory {
                sku: sku.clone(),
                requested: *amount,
                available: item.inventory,
            });
        }
    }

    for (sku, amount) in &per_sku {
        if let Some(item) = state.items.iter_mut().find(|i| &i.sku == sku) {
            item.decrement(*amount);
        }
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn item_by_sku(&self, sku: &str) -> StoreResult<Option<Item>> {
        Ok(self.read()?.items.iter().find(|i| i.sku == sku).cloned())
    }

    async fn items_by_ids(&self, ids: &[ItemId]) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.items.iter().find(|i| &i.id == id).cloned())
            .collect())
    }

    async fn promotion_for(&self, item_id: &ItemId) -> StoreResult<Option<Promotion>> {
        Ok(self.read()?.promotions.get(item_id).cloned())
    }

    async fn decrement_inventory(&self, sku: &str, amount: i64) -> StoreResult<()> {
        let mut state = self.write()?;
        apply_decrements(&mut state, &[(sku.to_string(), amount)])
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn lines(&self, cart_id: &CartId) -> StoreResult<Vec<CartLine>> {
        Ok(self.read()?.carts.get(cart_id).cloned().unwrap_or_default())
    }

    async fn create_line(&self, cart_id: &CartId, line: CartLine) -> StoreResult<CartLine> {
        let line = with_line_id(line);
        self.write()?
            .carts
            .entry(cart_id.clone())
            .or_default()
            .push(line.clone());
        Ok(line)
    }

    async fn update_line(&self, cart_id: &CartId, line: CartLine) -> StoreResult<CartLine> {
        let mut state = self.write()?;
        let lines = state
            .carts
            .get_mut(cart_id)
            .ok_or_else(|| StoreError::NotFound(format!("cart {cart_id}")))?;
        let stored = lines
            .iter_mut()
            .find(|l| l.id.is_some() && l.id == line.id)
            .ok_or_else(|| StoreError::NotFound("cart line".to_string()))?;
        *stored = line.clone();
        Ok(line)
    }

    async fn replace_all(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLine>,
    ) -> StoreResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = lines.into_iter().map(with_line_id).collect();
        self.write()?.carts.insert(cart_id.clone(), lines.clone());
        Ok(lines)
    }

    async fn clear(&self, cart_id: &CartId) -> StoreResult<()> {
        // Clearing an absent cart is a no-op, not an error.
        self.write()?.carts.remove(cart_id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        let mut state = self.write()?;
        Ok(insert_order(&mut state, order))
    }

    async fn create_detail_line(
        &self,
        order_id: &OrderId,
        line: NewOrderLine,
    ) -> StoreResult<OrderLine> {
        let mut state = self.write()?;
        if !state.orders.iter().any(|o| &o.id == order_id) {
            return Err(StoreError::NotFound(format!("order {order_id}")));
        }
        Ok(insert_detail_line(&mut state, order_id, line))
    }

    async fn detail_lines(&self, order_id: &OrderId) -> StoreResult<Vec<OrderLine>> {
        Ok(self
            .read()?
            .order_lines
            .iter()
            .filter(|l| &l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn commit_checkout(&self, commit: CheckoutCommit) -> StoreResult<Order> {
        let mut state = self.write()?;

        // Decrements are validated in full before any write; a failure
        // here leaves orders, inventory, and the cart untouched.
        apply_decrements(&mut state, &commit.decrements)?;

        let order = insert_order(&mut state, commit.order);
        for line in commit.lines {
            insert_detail_line(&mut state, &order.id, line);
        }
        state.carts.remove(&commit.cart_id);
        Ok(order)
    }
}

fn insert_order(state: &mut State, order: NewOrder) -> Order {
    let now = current_timestamp();
    let order = Order {
        id: OrderId::generate(),
        total_price: order.total_price,
        created_at: now,
        updated_at: now,
    };
    state.orders.push(order.clone());
    order
}

fn insert_detail_line(state: &mut State, order_id: &OrderId, line: NewOrderLine) -> OrderLine {
    let line = OrderLine {
        id: OrderLineId::generate(),
        order_id: order_id.clone(),
        sku: line.sku,
        name: line.name,
        price: line.price,
        quantity: line.quantity,
        promotion: line.promotion,
        created_at: current_timestamp(),
    };
    state.order_lines.push(line.clone());
    line
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartwheel_commerce::money::{Currency, Money};
    use cartwheel_commerce::order::NewOrder;

    fn seeded() -> (MemoryStore, Item) {
        let store = MemoryStore::new();
        let item = Item::new("SKU-1", "Google Home", Money::from_major(10, Currency::USD), 5);
        store.insert_item(item.clone()).unwrap();
        (store, item)
    }

    #[tokio::test]
    async fn test_item_lookup() {
        let (store, item) = seeded();
        let found = store.item_by_sku("SKU-1").await.unwrap().unwrap();
        assert_eq!(found.id, item.id);
        assert!(store.item_by_sku("SKU-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cart_create_update_clear() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");

        let line = store
            .create_line(&cart_id, CartLine::paid(item.id.clone(), 2))
            .await
            .unwrap();
        assert!(line.id.is_some());

        let mut updated = line.clone();
        updated.quantity = 4;
        store.update_line(&cart_id, updated).await.unwrap();
        let lines = store.lines(&cart_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 4);

        store.clear(&cart_id).await.unwrap();
        assert!(store.lines(&cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_line_fails() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");
        store
            .create_line(&cart_id, CartLine::paid(item.id.clone(), 1))
            .await
            .unwrap();

        let mut orphan = CartLine::paid(item.id.clone(), 1);
        orphan.id = Some(LineId::new("line-404"));
        assert!(matches!(
            store.update_line(&cart_id, orphan).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_all_assigns_ids() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");
        let stored = store
            .replace_all(
                &cart_id,
                vec![
                    CartLine::paid(item.id.clone(), 3),
                    CartLine::bonus(item.id.clone(), 1),
                ],
            )
            .await
            .unwrap();
        assert!(stored.iter().all(|l| l.id.is_some()));
        assert_eq!(store.lines(&cart_id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_decrement_inventory_guard() {
        let (store, _) = seeded();
        store.decrement_inventory("SKU-1", 3).await.unwrap();

        let err = store.decrement_inventory("SKU-1", 3).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientInventory { .. }));

        let item = store.item_by_sku("SKU-1").await.unwrap().unwrap();
        assert_eq!(item.inventory, 2);
    }

    #[tokio::test]
    async fn test_commit_checkout_applies_everything() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");
        store
            .replace_all(&cart_id, vec![CartLine::paid(item.id.clone(), 3)])
            .await
            .unwrap();

        let order = store
            .commit_checkout(CheckoutCommit {
                cart_id: cart_id.clone(),
                order: NewOrder {
                    total_price: Money::from_major(30, Currency::USD),
                },
                lines: vec![NewOrderLine {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    price: Money::from_major(30, Currency::USD),
                    quantity: 3,
                    promotion: None,
                }],
                decrements: vec![(item.sku.clone(), 3)],
            })
            .await
            .unwrap();

        assert_eq!(order.total_price, Money::from_major(30, Currency::USD));
        assert_eq!(store.detail_lines(&order.id).await.unwrap().len(), 1);
        assert!(store.lines(&cart_id).await.unwrap().is_empty());
        let item = store.item_by_sku("SKU-1").await.unwrap().unwrap();
        assert_eq!(item.inventory, 2);
    }

    #[tokio::test]
    async fn test_commit_checkout_rolls_back_wholesale() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");
        let lines = store
            .replace_all(&cart_id, vec![CartLine::paid(item.id.clone(), 9)])
            .await
            .unwrap();

        // Requested 9, only 5 in stock: nothing may be written.
        let err = store
            .commit_checkout(CheckoutCommit {
                cart_id: cart_id.clone(),
                order: NewOrder {
                    total_price: Money::from_major(90, Currency::USD),
                },
                lines: vec![NewOrderLine {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    price: Money::from_major(90, Currency::USD),
                    quantity: 9,
                    promotion: None,
                }],
                decrements: vec![(item.sku.clone(), 9)],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InsufficientInventory { .. }));
        assert_eq!(store.order_count().unwrap(), 0);
        assert_eq!(store.lines(&cart_id).await.unwrap(), lines);
        let item = store.item_by_sku("SKU-1").await.unwrap().unwrap();
        assert_eq!(item.inventory, 5);
    }

    #[tokio::test]
    async fn test_commit_aggregates_decrements_per_sku() {
        let (store, item) = seeded();
        let cart_id = CartId::new("cart-1");

        // Paid 4 + bonus 2 = 6 > 5 in stock, even though each decrement
        // alone would fit.
        let err = store
            .commit_checkout(CheckoutCommit {
                cart_id,
                order: NewOrder {
                    total_price: Money::from_major(40, Currency::USD),
                },
                lines: vec![],
                decrements: vec![(item.sku.clone(), 4), (item.sku.clone(), 2)],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientInventory { .. }));
    }
}
