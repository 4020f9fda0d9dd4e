use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    NewOrder, Order, OrderId, OrderQuery, Result, StoreError,
    store::{OrderStore, StatusUpdate},
};

/// In-memory order store implementation.
///
/// Provides the same interface and semantics as the PostgreSQL
/// implementation, including conditional status updates. Failure injection
/// switches let tests exercise the persistence-failure paths.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Removes an order, simulating an external administrative deletion.
    pub async fn remove(&self, order_id: &OrderId) -> Option<Order> {
        self.orders.write().await.remove(order_id)
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }

    /// Makes `find_by_id` and `list` fail while set.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes `insert` and `update_status` fail while set.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        self.check_writes()?;

        let mut store = self.orders.write().await;

        let mut id = OrderId::generate();
        while store.contains_key(&id) {
            id = OrderId::generate();
        }

        let order = order.with_id(id.clone());
        store.insert(id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>> {
        self.check_reads()?;

        let store = self.orders.read().await;
        Ok(store.get(order_id).cloned())
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<()> {
        self.check_writes()?;

        let mut store = self.orders.write().await;
        let order = store
            .get_mut(&update.order_id)
            .ok_or_else(|| StoreError::NotFound(update.order_id.clone()))?;

        if let Some(expected) = update.expected_status
            && order.status != expected
        {
            return Err(StoreError::StatusConflict {
                order_id: update.order_id,
                expected,
                actual: order.status,
            });
        }

        order.status = update.new_status;
        order.updated_at = update.updated_at;
        Ok(())
    }

    async fn list(&self, query: OrderQuery) -> Result<Vec<Order>> {
        self.check_reads()?;

        let store = self.orders.read().await;
        let mut orders: Vec<_> = store
            .values()
            .filter(|o| {
                if let Some(status) = query.status
                    && o.status != status
                {
                    return false;
                }
                if let Some(ref customer_id) = query.customer_id
                    && &o.customer_id != customer_id
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        // Newest first, identifier as tie-breaker
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(orders
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}
