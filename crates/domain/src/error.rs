//! Domain error types.

use common::{OrderId, OrderStatus, ParseStatusError};
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Every variant maps to a stable machine-readable code via [`OrderError::code`].
/// Cache and notifier failures never appear here: they are best-effort and
/// reported through [`crate::SideEffect`] instead.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is missing a required field.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The order payload failed validation.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// A status literal is not one of the known statuses.
    #[error("Invalid status: {0:?}")]
    InvalidStatus(String),

    /// The state machine does not allow this move.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// No order exists with the given identifier.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Page or limit out of range.
    #[error("Invalid pagination: page {page}, limit {limit}")]
    InvalidPagination { page: i64, limit: i64 },

    /// The order changed status between read and write. Safe to retry.
    #[error("Order {order_id} changed concurrently: expected {expected}, found {actual}")]
    Conflict {
        order_id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// The order store failed.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(StoreError),
}

impl OrderError {
    /// Stable code for rendering to clients.
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::InvalidRequest(_) => "INVALID_REQUEST",
            OrderError::InvalidOrder(_) => "INVALID_ORDER",
            OrderError::InvalidStatus(_) => "INVALID_STATUS",
            OrderError::InvalidTransition { .. } => "INVALID_TRANSITION",
            OrderError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            OrderError::InvalidPagination { .. } => "INVALID_PAGINATION",
            OrderError::Conflict { .. } => "CONFLICT",
            OrderError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Conflict { .. })
    }
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OrderError::OrderNotFound(id),
            StoreError::StatusConflict {
                order_id,
                expected,
                actual,
            } => OrderError::Conflict {
                order_id,
                expected,
                actual,
            },
            other => OrderError::PersistenceFailure(other),
        }
    }
}

impl From<ParseStatusError> for OrderError {
    fn from(e: ParseStatusError) -> Self {
        OrderError::InvalidStatus(e.0)
    }
}
