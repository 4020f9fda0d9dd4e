//! Status-change event payload.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderStatus};
use serde::{Deserialize, Serialize};

/// Published after every durable status change.
///
/// Serialized as
/// `{"order_id": .., "old_status": .., "new_status": .., "timestamp": <RFC3339>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl OrderStatusChanged {
    /// Creates a new event.
    pub fn new(
        order_id: OrderId,
        old_status: OrderStatus,
        new_status: OrderStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            old_status,
            new_status,
            timestamp,
        }
    }

    /// Message key used for partitioning.
    pub fn key(&self) -> &str {
        self.order_id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serializes_to_wire_shape() {
        let event = OrderStatusChanged::new(
            OrderId::new("ORD-1a2b3c4d"),
            OrderStatus::New,
            OrderStatus::InProgress,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "order_id": "ORD-1a2b3c4d",
                "old_status": "NEW",
                "new_status": "IN_PROGRESS",
                "timestamp": "2024-05-01T12:30:00Z"
            })
        );
    }

    #[test]
    fn key_is_order_id() {
        let event = OrderStatusChanged::new(
            OrderId::new("ORD-1"),
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            Utc::now(),
        );
        assert_eq!(event.key(), "ORD-1");
    }
}
