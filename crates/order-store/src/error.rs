use common::ParseStatusError;
use thiserror::Error;

use crate::{OrderId, OrderStatus};

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order exists with the given identifier.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A conditional status update found a different status than expected.
    #[error("Status conflict for order {order_id}: expected {expected}, found {actual}")]
    StatusConflict {
        order_id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// A stored row carried a status literal outside the known set.
    #[error("Corrupt order record: {0}")]
    InvalidStatus(#[from] ParseStatusError),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
