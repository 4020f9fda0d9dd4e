use crate::OrderStatus;

/// Builder for constructing order listing queries.
///
/// Allows filtering orders by status and customer, with offset/limit
/// pagination. Filters that are set are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    /// Filter by status.
    pub status: Option<OrderStatus>,

    /// Filter by customer ID.
    pub customer_id: Option<String>,

    /// Number of orders to skip.
    pub offset: usize,

    /// Maximum number of orders to return.
    pub limit: usize,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            customer_id: None,
            offset: 0,
            limit: 10,
        }
    }
}

impl OrderQuery {
    /// Creates a new query with no filters returning the first 10 orders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a 1-based page of `limit` orders.
    ///
    /// Page 0 is treated as page 1; range checks belong to the caller.
    pub fn page(page: u32, limit: u32) -> Self {
        let limit = limit as usize;
        Self {
            offset: (page.max(1) as usize - 1).saturating_mul(limit),
            limit,
            ..Default::default()
        }
    }

    /// Filters by status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by customer ID.
    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Sets the offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
