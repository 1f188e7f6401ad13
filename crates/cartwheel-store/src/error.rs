//! Storage error types.

use cartwheel_commerce::CommerceError;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An inventory decrement would go below zero.
    #[error("insufficient inventory for {sku}: requested {requested}, available {available}")]
    InsufficientInventory {
        sku: String,
        requested: i64,
        available: i64,
    },

    /// Backend failure (connection, query, serialization).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Wrap a backend failure with context.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for CommerceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InsufficientInventory {
                sku,
                requested,
                available,
            } => CommerceError::InsufficientInventory {
                sku,
                requested,
                available,
            },
            other => CommerceError::Storage(other.to_string()),
        }
    }
}
