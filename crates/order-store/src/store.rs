use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{NewOrder, Order, OrderId, OrderQuery, OrderStatus, Result};

/// A status-only write against a single order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// The order to update.
    pub order_id: OrderId,

    /// The status to write.
    pub new_status: OrderStatus,

    /// The new `updated_at` timestamp.
    pub updated_at: DateTime<Utc>,

    /// Status the order must currently have for the write to apply.
    /// If None, the write applies to whatever status is stored (use with caution).
    pub expected_status: Option<OrderStatus>,
}

impl StatusUpdate {
    /// Creates an unconditional status update.
    pub fn new(order_id: OrderId, new_status: OrderStatus, updated_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            new_status,
            updated_at,
            expected_status: None,
        }
    }

    /// Makes the update conditional on the order currently having `status`.
    pub fn expect_current(mut self, status: OrderStatus) -> Self {
        self.expected_status = Some(status);
        self
    }
}

/// Core trait for order store implementations.
///
/// The store is the system of record for orders. All implementations must be
/// thread-safe (Send + Sync) and safe for unbounded concurrent use.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order and returns it with its store-assigned identifier.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Looks up an order by identifier.
    ///
    /// Returns None if no order has that identifier.
    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>>;

    /// Atomically sets the status and `updated_at` of a single order.
    ///
    /// Fails with `NotFound` if no order matches the identifier, and with
    /// `StatusConflict` if `expected_status` is set and does not match the
    /// stored status. Nothing is written in either case.
    async fn update_status(&self, update: StatusUpdate) -> Result<()>;

    /// Lists orders matching the query.
    ///
    /// Filters are combined with AND. Results are ordered by `created_at`
    /// descending (identifier descending on ties), then offset and limit are
    /// applied.
    async fn list(&self, query: OrderQuery) -> Result<Vec<Order>>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        (**self).insert(order).await
    }

    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>> {
        (**self).find_by_id(order_id).await
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<()> {
        (**self).update_status(update).await
    }

    async fn list(&self, query: OrderQuery) -> Result<Vec<Order>> {
        (**self).list(query).await
    }
}
