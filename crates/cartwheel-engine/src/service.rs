//! Order service: the AddCart and ConfirmOrder orchestrators.

use crate::config::EngineConfig;
use cartwheel_commerce::cart::{Cart, CartLine};
use cartwheel_commerce::catalog::{Item, PromotionRule};
use cartwheel_commerce::error::CommerceError;
use cartwheel_commerce::ids::{CartId, ItemId};
use cartwheel_commerce::money::Money;
use cartwheel_commerce::order::{NewOrder, NewOrderLine, Order};
use cartwheel_commerce::pricing::{bonus_detail, evaluate_line, BonusTally};
use cartwheel_store::{CartStore, CatalogStore, CheckoutCommit, OrderStore};
use futures::future;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The engine's public surface: cart consolidation and order
/// confirmation over one storage backend.
///
/// Mutating operations are serialized by an internal lock so concurrent
/// calls never race on read-then-write of cart lines and inventory; the
/// per-call timeout budget includes time spent waiting for that lock.
/// Dropping a timed-out call cancels its in-flight storage futures.
pub struct OrderService<S> {
    store: Arc<S>,
    config: EngineConfig,
    write_gate: Mutex<()>,
}

impl<S> OrderService<S>
where
    S: CatalogStore + CartStore + OrderStore,
{
    /// Create a service with the default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create a service with an explicit configuration.
    pub fn with_config(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            write_gate: Mutex::new(()),
        }
    }

    /// Merge (SKU, quantity) into the cart, re-fold bonus lines, and
    /// persist the whole mutated cart.
    ///
    /// Returns the paid line for the requested item, post-merge. Fails
    /// without persisting anything on invalid input, unknown SKU, or a
    /// resulting quantity that exceeds inventory.
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        sku: &str,
        quantity: i64,
    ) -> Result<CartLine, CommerceError> {
        tokio::time::timeout(
            self.config.op_timeout,
            self.add_to_cart_inner(cart_id, sku, quantity),
        )
        .await
        .map_err(|_| CommerceError::DeadlineExceeded)?
    }

    /// Convert the cart into a confirmed order: price every line, sum
    /// the total, and atomically persist order + detail lines +
    /// inventory decrements + cart clear.
    pub async fn confirm_order(&self, cart_id: &CartId) -> Result<Order, CommerceError> {
        tokio::time::timeout(self.config.op_timeout, self.confirm_order_inner(cart_id))
            .await
            .map_err(|_| CommerceError::DeadlineExceeded)?
    }

    async fn add_to_cart_inner(
        &self,
        cart_id: &CartId,
        sku: &str,
        quantity: i64,
    ) -> Result<CartLine, CommerceError> {
        if sku.trim().is_empty() {
            return Err(CommerceError::InvalidSku);
        }
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let _gate = self.write_gate.lock().await;

        let item = self
            .store
            .item_by_sku(sku)
            .await?
            .ok_or_else(|| CommerceError::ItemNotFound(sku.to_string()))?;

        let lines = self.store.lines(cart_id).await?;
        let mut cart = Cart::from_lines(cart_id.clone(), lines);
        cart.merge_paid(item.id.clone(), quantity)?;

        // Re-fold free_items bonuses across the whole cart, not just the
        // touched line.
        let tally = self.fold_bonuses(&cart).await?;
        if !tally.is_empty() {
            debug!(cart = %cart_id, items = tally.iter().count(), "refolded bonus lines");
        }
        cart.apply_bonuses(tally.into_entries());

        self.check_inventory(&cart).await?;

        let stored = self
            .store
            .replace_all(cart_id, cart.into_lines())
            .await?;
        info!(cart = %cart_id, sku, quantity, "merged line into cart");

        stored
            .into_iter()
            .find(|l| !l.is_bonus() && l.item_id == item.id)
            .ok_or_else(|| CommerceError::ItemNotFound(sku.to_string()))
    }

    async fn confirm_order_inner(&self, cart_id: &CartId) -> Result<Order, CommerceError> {
        let _gate = self.write_gate.lock().await;

        let lines = self.store.lines(cart_id).await?;
        if lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let cart = Cart::from_lines(cart_id.clone(), lines);

        let items = self.resolve_items(&cart).await?;

        // Price the paid lines, accumulating free units per item; bonus
        // cart lines are recomputed from the paid quantities (they match
        // what the consolidator persisted).
        let paid: Vec<(&CartLine, &Item)> = cart
            .paid_lines()
            .map(|line| {
                items
                    .get(&line.item_id)
                    .map(|item| (line, item))
                    .ok_or_else(|| {
                        CommerceError::ItemNotFound(line.item_id.as_str().to_string())
                    })
            })
            .collect::<Result<_, _>>()?;

        let promotions = future::try_join_all(
            paid.iter()
                .map(|(line, _)| self.store.promotion_for(&line.item_id)),
        )
        .await?;

        let mut details: Vec<NewOrderLine> = Vec::new();
        let mut tally = BonusTally::new();
        for ((line, item), promotion) in paid.iter().copied().zip(promotions) {
            let eval = evaluate_line(item, line.quantity, promotion.as_ref())?;
            tally.add(item.id.clone(), eval.bonus_units);
            details.push(eval.detail);
        }
        for (item_id, units) in tally.iter() {
            let item = items
                .get(item_id)
                .ok_or_else(|| CommerceError::ItemNotFound(item_id.as_str().to_string()))?;
            details.push(bonus_detail(item, units));
        }

        let currency = details
            .first()
            .map(|d| d.price.currency)
            .ok_or(CommerceError::EmptyCart)?;
        let total_price = Money::try_sum(details.iter().map(|d| &d.price), currency)
            .ok_or(CommerceError::Overflow)?;

        let decrements = details
            .iter()
            .map(|d| (d.sku.clone(), d.quantity))
            .collect();

        let order = self
            .store
            .commit_checkout(CheckoutCommit {
                cart_id: cart_id.clone(),
                order: NewOrder { total_price },
                lines: details,
                decrements,
            })
            .await?;

        info!(cart = %cart_id, order = %order.id, total = %order.total_price, "order confirmed");
        Ok(order)
    }

    /// Accumulate free_items bonus units across the cart's paid lines,
    /// resolving promotions concurrently (read-only lookups).
    async fn fold_bonuses(&self, cart: &Cart) -> Result<BonusTally, CommerceError> {
        let paid: Vec<(ItemId, i64)> = cart
            .paid_lines()
            .map(|l| (l.item_id.clone(), l.quantity))
            .collect();

        let promotions = future::try_join_all(
            paid.iter()
                .map(|(item_id, _)| self.store.promotion_for(item_id)),
        )
        .await?;

        let mut tally = BonusTally::new();
        for ((item_id, quantity), promotion) in paid.iter().zip(promotions) {
            if let Some(promotion) = promotion {
                promotion.rule.validate(item_id)?;
                if let PromotionRule::FreeItems { requirement } = promotion.rule {
                    tally.add(item_id.clone(), quantity / requirement);
                }
            }
        }
        Ok(tally)
    }

    /// Validate every item's paid + bonus quantity against inventory.
    async fn check_inventory(&self, cart: &Cart) -> Result<(), CommerceError> {
        let items = self.resolve_items(cart).await?;
        for line in cart.lines() {
            let item = items
                .get(&line.item_id)
                .ok_or_else(|| CommerceError::ItemNotFound(line.item_id.as_str().to_string()))?;
            let requested = cart.total_quantity_for(&line.item_id);
            if !item.can_fulfill(requested) {
                return Err(CommerceError::InsufficientInventory {
                    sku: item.sku.clone(),
                    requested,
                    available: item.inventory,
                });
            }
        }
        Ok(())
    }

    /// Batch-resolve the items referenced by a cart. A line whose item
    /// cannot be resolved is an error, never silently skipped.
    async fn resolve_items(&self, cart: &Cart) -> Result<HashMap<ItemId, Item>, CommerceError> {
        let mut ids: Vec<ItemId> = Vec::new();
        for line in cart.lines() {
            if !ids.contains(&line.item_id) {
                ids.push(line.item_id.clone());
            }
        }

        let items = self.store.items_by_ids(&ids).await?;
        Ok(items.into_iter().map(|i| (i.id.clone(), i)).collect())
    }
}
