//! Order lifecycle: status state machine, operation types and the service
//! that orchestrates store, cache and notifier.

mod commands;
mod service;
pub mod state;

pub use commands::{CreateOrder, ListOrders, SideEffect, StatusChange};
pub use service::{OrderService, OrderServiceConfig};
pub use state::{StatusTransitions, is_valid_transition, validate_transition};
