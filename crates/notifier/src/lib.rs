//! Status-change notifications for orders.
//!
//! Delivery is at-least-once at best: a failed publish is reported to the
//! caller, who logs it and moves on. Consumers must be idempotent.

pub mod error;
pub mod event;
pub mod kafka;
pub mod memory;
pub mod publisher;

pub use error::{NotifyError, Result};
pub use event::OrderStatusChanged;
pub use kafka::{KafkaConfig, KafkaNotifier};
pub use memory::InMemoryNotifier;
pub use publisher::EventNotifier;
