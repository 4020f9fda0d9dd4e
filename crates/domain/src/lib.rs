//! Domain layer for the order lifecycle service.
//!
//! This crate provides:
//! - The order status state machine
//! - `OrderService`, which orchestrates the order store, the cache and the
//!   event notifier and owns the consistency policy between them
//! - `OrderError`, the typed failure every operation returns

pub mod error;
pub mod order;

pub use common::{Money, Order, OrderId, OrderItem, OrderStatus};
pub use error::OrderError;
pub use order::{
    CreateOrder, ListOrders, OrderService, OrderServiceConfig, SideEffect, StatusChange,
    StatusTransitions, is_valid_transition, validate_transition,
};
