//! Order lifecycle orchestration.
//!
//! [`OrderService`] composes the order store, the cache and the event
//! notifier. The store is the system of record and its failures surface to
//! the caller. Cache and notifier calls are best-effort: failures are logged,
//! counted and reported back, but never fail or roll back an operation.

use std::time::{Duration, Instant};

use cache::Cache;
use chrono::Utc;
use common::{NewOrder, Order, OrderId, OrderStatus, checked_total};
use notifier::{EventNotifier, OrderStatusChanged};
use order_store::{OrderQuery, OrderStore, StatusUpdate};

use crate::error::OrderError;

use super::commands::{CreateOrder, ListOrders, SideEffect, StatusChange};
use super::state;

/// Tunables for [`OrderService`].
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    /// How long a backfilled cache entry lives.
    pub cache_ttl: Duration,

    /// Largest accepted page size for listing.
    pub max_page_limit: u32,
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            max_page_limit: 100,
        }
    }
}

/// Records `order_operation_duration_seconds` when dropped, so early returns
/// are measured too.
struct OperationTimer {
    op: &'static str,
    start: Instant,
}

impl OperationTimer {
    fn start(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        metrics::histogram!("order_operation_duration_seconds", "op" => self.op)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Service for managing the order lifecycle.
///
/// Holds no mutable state of its own; share it behind an `Arc`.
pub struct OrderService<S, C, N> {
    store: S,
    cache: C,
    notifier: N,
    config: OrderServiceConfig,
}

impl<S, C, N> OrderService<S, C, N>
where
    S: OrderStore,
    C: Cache,
    N: EventNotifier,
{
    /// Creates a new order service.
    pub fn new(store: S, cache: C, notifier: N, config: OrderServiceConfig) -> Self {
        Self {
            store,
            cache,
            notifier,
            config,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns a reference to the underlying notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &OrderServiceConfig {
        &self.config
    }

    /// Creates a new order in `NEW` status.
    ///
    /// Validation happens before any I/O. Creation writes nothing to the
    /// cache and publishes no event.
    #[tracing::instrument(skip(self, cmd), fields(customer_id = %cmd.customer_id, items = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, OrderError> {
        let _timer = OperationTimer::start("create");
        validate_new_order(&cmd)?;

        let now = Utc::now();
        let new_order = NewOrder {
            customer_id: cmd.customer_id,
            status: OrderStatus::New,
            items: cmd.items,
            created_at: now,
            updated_at: now,
        };

        let order = self.store.insert(new_order).await.map_err(|e| {
            tracing::error!(error = %e, "failed to persist order");
            OrderError::PersistenceFailure(e)
        })?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, "order created");
        Ok(order)
    }

    /// Loads an order, serving from the cache when possible.
    ///
    /// Cache errors and undecodable entries count as misses. On a miss the
    /// stored record is written back with the configured TTL.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        let _timer = OperationTimer::start("get");
        let key = order_id.cache_key();

        if let Some(order) = self.read_cached(&key).await {
            metrics::counter!("order_cache_hits_total").increment(1);
            return Ok(order);
        }
        metrics::counter!("order_cache_misses_total").increment(1);

        let order = self
            .store
            .find_by_id(order_id)
            .await
            .map_err(OrderError::PersistenceFailure)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        self.backfill(&key, &order).await;
        Ok(order)
    }

    /// Lists orders, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, req: ListOrders) -> Result<Vec<Order>, OrderError> {
        let _timer = OperationTimer::start("list");

        if req.page < 1 || req.limit < 1 || req.limit > i64::from(self.config.max_page_limit) {
            return Err(OrderError::InvalidPagination {
                page: req.page,
                limit: req.limit,
            });
        }

        // Pages past u32::MAX are necessarily empty
        let page = u32::try_from(req.page).unwrap_or(u32::MAX);
        let limit = u32::try_from(req.limit).unwrap_or(self.config.max_page_limit);
        let mut query = OrderQuery::page(page, limit);
        if let Some(status) = req.status.as_deref().filter(|s| !s.is_empty()) {
            query = query.status(status.parse::<OrderStatus>()?);
        }
        if let Some(customer_id) = req.customer_id.filter(|c| !c.is_empty()) {
            query = query.customer_id(customer_id);
        }

        self.store
            .list(query)
            .await
            .map_err(OrderError::PersistenceFailure)
    }

    /// Moves an order to the status named by `requested`.
    ///
    /// Unknown literals fail with [`OrderError::InvalidStatus`] before any I/O.
    pub async fn update_status(
        &self,
        order_id: &OrderId,
        requested: &str,
    ) -> Result<StatusChange, OrderError> {
        let new_status: OrderStatus = requested.parse()?;
        self.transition(order_id, new_status).await
    }

    /// Moves an order to `new_status`.
    ///
    /// Ordering is persist, then notify, then invalidate. The store update is
    /// conditional on the status read at the start, so a concurrent change
    /// yields [`OrderError::Conflict`] instead of a lost update. Once the
    /// store commits, the call succeeds regardless of what happens to the
    /// notification or the cache.
    #[tracing::instrument(skip(self))]
    pub async fn transition(
        &self,
        order_id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<StatusChange, OrderError> {
        let _timer = OperationTimer::start("update_status");

        // Always the store: a cached copy may be stale
        let current = self
            .store
            .find_by_id(order_id)
            .await
            .map_err(OrderError::PersistenceFailure)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        let old_status = current.status;
        state::validate_transition(old_status, new_status)?;

        let updated_at = Utc::now().max(current.created_at);
        let update = StatusUpdate::new(order_id.clone(), new_status, updated_at)
            .expect_current(old_status);

        self.store.update_status(update).await.map_err(|e| {
            tracing::error!(error = %e, "failed to persist status change");
            OrderError::from(e)
        })?;

        metrics::counter!(
            "order_status_transitions_total",
            "from" => old_status.as_str(),
            "to" => new_status.as_str()
        )
        .increment(1);
        tracing::info!(%old_status, %new_status, "order status updated");

        let event = OrderStatusChanged::new(order_id.clone(), old_status, new_status, updated_at);
        let notification = self.publish(&event).await;
        let cache_invalidation = self.invalidate(&order_id.cache_key()).await;

        Ok(StatusChange {
            event,
            notification,
            cache_invalidation,
        })
    }

    async fn read_cached(&self, key: &str) -> Option<Order> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                metrics::counter!("order_cache_errors_total", "op" => "get").increment(1);
                tracing::warn!(key, error = %e, "cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(order) => Some(order),
            Err(e) => {
                metrics::counter!("order_cache_errors_total", "op" => "decode").increment(1);
                tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    async fn backfill(&self, key: &str, order: &Order) {
        let result = match serde_json::to_string(order) {
            Ok(value) => self
                .cache
                .set(key, &value, self.config.cache_ttl)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(e) = result {
            metrics::counter!("order_cache_errors_total", "op" => "set").increment(1);
            tracing::warn!(key, error = %e, "cache backfill failed");
        }
    }

    async fn publish(&self, event: &OrderStatusChanged) -> SideEffect {
        let result = self.notifier.publish(event).await;
        if let Err(e) = &result {
            metrics::counter!("order_events_publish_failures_total").increment(1);
            tracing::error!(
                order_id = %event.order_id,
                old_status = %event.old_status,
                new_status = %event.new_status,
                error = %e,
                "failed to publish status change event"
            );
        }
        SideEffect::from_result(result)
    }

    async fn invalidate(&self, key: &str) -> SideEffect {
        let result = self.cache.delete(key).await;
        if let Err(e) = &result {
            metrics::counter!("order_cache_errors_total", "op" => "delete").increment(1);
            tracing::warn!(key, error = %e, "cache invalidation failed, entry expires with TTL");
        }
        SideEffect::from_result(result)
    }
}

fn validate_new_order(cmd: &CreateOrder) -> Result<(), OrderError> {
    if cmd.customer_id.trim().is_empty() {
        return Err(OrderError::InvalidRequest(
            "customer_id is required".to_string(),
        ));
    }

    if cmd.items.is_empty() {
        return Err(OrderError::InvalidOrder(
            "order must contain at least one item".to_string(),
        ));
    }

    for (index, item) in cmd.items.iter().enumerate() {
        if item.sku.is_blank() {
            return Err(OrderError::InvalidOrder(format!(
                "item {index}: sku is required"
            )));
        }
        if item.quantity <= 0 {
            return Err(OrderError::InvalidOrder(format!(
                "item {index}: quantity must be greater than 0"
            )));
        }
        if item.unit_price.is_negative() {
            return Err(OrderError::InvalidOrder(format!(
                "item {index}: unit price must not be negative"
            )));
        }
        if item.checked_total_price().is_none() {
            return Err(OrderError::InvalidOrder(format!(
                "item {index}: line total is too large"
            )));
        }
    }

    if checked_total(&cmd.items).is_none() {
        return Err(OrderError::InvalidOrder(
            "order total is too large".to_string(),
        ));
    }

    Ok(())
}
