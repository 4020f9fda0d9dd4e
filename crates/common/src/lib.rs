//! Shared types for the order lifecycle service.
//!
//! The order record defined here is the entity every other crate operates on:
//! the store persists it, the cache holds serialized snapshots of it, and the
//! API renders it.

pub mod order;
pub mod types;

pub use order::{
    Money, NewOrder, Order, OrderItem, OrderStatus, ParseStatusError, Sku, checked_total,
};
pub use types::OrderId;
