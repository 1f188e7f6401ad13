//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// SKU was empty or malformed.
    #[error("Invalid SKU")]
    InvalidSku,

    /// Quantity was zero or negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Promotion rule carried malformed data (e.g., a zero quantity
    /// requirement, which would divide by zero during evaluation).
    #[error("Invalid promotion for item {item_id}: {reason}")]
    InvalidPromotion { item_id: String, reason: String },

    /// Item not found in the catalog.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Requested quantity exceeds available inventory.
    #[error("Insufficient inventory for {sku}: requested {requested}, available {available}")]
    InsufficientInventory {
        sku: String,
        requested: i64,
        available: i64,
    },

    /// Confirm was called on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The operation did not complete within its time budget.
    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    /// Arithmetic overflow or currency mismatch in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Storage error, wrapped with context.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CommerceError {
    /// Wrap a storage-layer failure with context.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        CommerceError::Storage(err.to_string())
    }
}
