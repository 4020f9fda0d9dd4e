//! Order operation inputs and outcomes.

use common::{OrderId, OrderItem, OrderStatus};
use notifier::OrderStatusChanged;

/// Request to create an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The customer placing the order.
    pub customer_id: String,

    /// Line items. Must not be empty.
    pub items: Vec<OrderItem>,
}

impl CreateOrder {
    /// Creates a new CreateOrder request.
    pub fn new(customer_id: impl Into<String>, items: Vec<OrderItem>) -> Self {
        Self {
            customer_id: customer_id.into(),
            items,
        }
    }
}

/// Request to list orders.
///
/// Filters are kept as raw strings so validation of the status literal
/// happens in one place. Empty strings are treated as absent. Page and
/// limit are signed so out-of-range values reach the range check.
#[derive(Debug, Clone)]
pub struct ListOrders {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl ListOrders {
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 10;

    /// First page, default page size, no filters.
    pub fn new() -> Self {
        Self {
            status: None,
            customer_id: None,
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Filters by status literal.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filters by customer.
    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Selects a page.
    pub fn page(mut self, page: i64, limit: i64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

impl Default for ListOrders {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a best-effort side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Applied,
    Failed(String),
}

impl SideEffect {
    /// Returns true if the side effect took place.
    pub fn is_applied(&self) -> bool {
        matches!(self, SideEffect::Applied)
    }

    pub(crate) fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => SideEffect::Applied,
            Err(e) => SideEffect::Failed(e.to_string()),
        }
    }
}

/// Result of a committed status update.
///
/// The status change itself is durable. `notification` and
/// `cache_invalidation` report what happened to the best-effort steps that
/// follow it.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// The event that was (or should have been) published.
    pub event: OrderStatusChanged,

    /// Whether the event reached the notifier.
    pub notification: SideEffect,

    /// Whether the cached copy was removed.
    pub cache_invalidation: SideEffect,
}

impl StatusChange {
    pub fn order_id(&self) -> &OrderId {
        &self.event.order_id
    }

    pub fn old_status(&self) -> OrderStatus {
        self.event.old_status
    }

    pub fn new_status(&self) -> OrderStatus {
        self.event.new_status
    }
}
