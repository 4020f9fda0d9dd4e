//! The order record and its value objects.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::OrderId;

/// Lifecycle status of an order.
///
/// Serialized using the wire literals `NEW`, `IN_PROGRESS`, `DELIVERED` and
/// `CANCELLED`. Which moves between them are allowed is decided by the
/// domain layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Freshly created order. The only initial status.
    #[default]
    New,

    /// Order is being prepared.
    InProgress,

    /// Order reached the customer (terminal).
    Delivered,

    /// Order was cancelled (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Returns the wire literal for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not one of the four status literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Stock keeping unit identifying the product of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a SKU from a string.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the SKU is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.0.abs() % 100
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "-{}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product being ordered.
    pub sku: Sku,

    /// Quantity ordered. Must be greater than zero.
    pub quantity: i64,

    /// Price per unit. Must not be negative.
    #[serde(rename = "unit_price_cents")]
    pub unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(sku: impl Into<Sku>, quantity: i64, unit_price: Money) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns quantity * unit_price, or `None` if it does not fit in an `i64`.
    pub fn checked_total_price(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// An order that has not been persisted yet and therefore has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewOrder {
    /// Attaches the store-assigned identifier, producing a full record.
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            customer_id: self.customer_id,
            status: self.status,
            items: self.items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of all line totals.
    ///
    /// Validated orders never overflow; anything else is clamped to
    /// `i64::MAX` cents instead of wrapping.
    pub fn total_amount(&self) -> Money {
        checked_total(&self.items).unwrap_or(Money::from_cents(i64::MAX))
    }
}

/// Sums the line totals of `items`, returning `None` if any step overflows.
pub fn checked_total(items: &[OrderItem]) -> Option<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        acc.checked_add(item.checked_total_price()?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_wire_literals() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let parsed: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn status_parses_from_literal() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_literal() {
        let err = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("SHIPPED".to_string()));
        assert!("new".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn default_status_is_new() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-12.34");
    }

    #[test]
    fn blank_sku_detection() {
        assert!(Sku::new("").is_blank());
        assert!(Sku::new("   ").is_blank());
        assert!(!Sku::new("S1").is_blank());
    }

    #[test]
    fn order_total_sums_line_items() {
        let now = Utc::now();
        let order = NewOrder {
            customer_id: "C1".to_string(),
            status: OrderStatus::New,
            items: vec![
                OrderItem::new("S1", 2, Money::from_cents(1000)),
                OrderItem::new("S2", 1, Money::from_cents(250)),
            ],
            created_at: now,
            updated_at: now,
        }
        .with_id(OrderId::new("ORD-00000001"));

        assert_eq!(order.total_amount().cents(), 2250);
    }

    #[test]
    fn money_checked_arithmetic() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(Money::from_cents(250).checked_mul(4), Some(Money::from_cents(1000)));
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn overflowing_total_is_detected_and_clamped() {
        let items = vec![OrderItem::new("S1", 2, Money::from_cents(i64::MAX))];
        assert_eq!(checked_total(&items), None);

        let split = vec![
            OrderItem::new("S1", 1, Money::from_cents(i64::MAX)),
            OrderItem::new("S2", 1, Money::from_cents(1)),
        ];
        assert_eq!(checked_total(&split), None);

        let now = Utc::now();
        let order = NewOrder {
            customer_id: "C1".to_string(),
            status: OrderStatus::New,
            items,
            created_at: now,
            updated_at: now,
        }
        .with_id(OrderId::new("ORD-00000002"));
        assert_eq!(order.total_amount().cents(), i64::MAX);
    }

    #[test]
    fn item_serializes_price_in_cents() {
        let item = OrderItem::new("S1", 2, Money::from_cents(1000));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"sku": "S1", "quantity": 2, "unit_price_cents": 1000})
        );
    }
}
