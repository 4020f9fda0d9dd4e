use std::sync::Arc;

use async_trait::async_trait;

use crate::{OrderStatusChanged, Result};

/// Publish side of the order event channel.
///
/// Implementations must be thread-safe (Send + Sync) and safe for unbounded
/// concurrent use.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// Publishes a status-change event, partitioned by order ID.
    async fn publish(&self, event: &OrderStatusChanged) -> Result<()>;
}

#[async_trait]
impl<T: EventNotifier + ?Sized> EventNotifier for Arc<T> {
    async fn publish(&self, event: &OrderStatusChanged) -> Result<()> {
        (**self).publish(event).await
    }
}
