//! In-memory notifier that records published events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{EventNotifier, NotifyError, OrderStatusChanged, Result};

/// In-memory notifier for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    published: Arc<RwLock<Vec<OrderStatusChanged>>>,
    fail_on_publish: Arc<AtomicBool>,
}

impl InMemoryNotifier {
    /// Creates a new notifier with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the notifier to reject publishes.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.fail_on_publish.store(fail, Ordering::SeqCst);
    }

    /// Returns every successfully published event, oldest first.
    pub async fn published(&self) -> Vec<OrderStatusChanged> {
        self.published.read().await.clone()
    }

    /// Returns the number of successfully published events.
    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }
}

#[async_trait]
impl EventNotifier for InMemoryNotifier {
    async fn publish(&self, event: &OrderStatusChanged) -> Result<()> {
        if self.fail_on_publish.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("broker unreachable".to_string()));
        }

        self.published.write().await.push(event.clone());
        tracing::debug!(order_id = %event.order_id, "event recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::{OrderId, OrderStatus};

    use super::*;

    fn event() -> OrderStatusChanged {
        OrderStatusChanged::new(
            OrderId::new("ORD-1"),
            OrderStatus::New,
            OrderStatus::InProgress,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn records_published_events() {
        let notifier = InMemoryNotifier::new();
        notifier.publish(&event()).await.unwrap();
        notifier.publish(&event()).await.unwrap();

        assert_eq!(notifier.published_count().await, 2);
        assert_eq!(
            notifier.published().await[0].new_status,
            OrderStatus::InProgress
        );
    }

    #[tokio::test]
    async fn fail_on_publish() {
        let notifier = InMemoryNotifier::new();
        notifier.set_fail_on_publish(true);

        let result = notifier.publish(&event()).await;
        assert!(matches!(result, Err(NotifyError::Unavailable(_))));
        assert_eq!(notifier.published_count().await, 0);

        notifier.set_fail_on_publish(false);
        notifier.publish(&event()).await.unwrap();
        assert_eq!(notifier.published_count().await, 1);
    }
}
