//! Order status state machine.
//!
//! ```text
//! NEW ──► IN_PROGRESS ──► DELIVERED
//!  │           │
//!  └───────────┴──► CANCELLED
//! ```
//!
//! `DELIVERED` and `CANCELLED` are terminal. Moving to the current status is
//! not a transition and is rejected.

use common::OrderStatus;

use crate::OrderError;

/// Statuses reachable in one step from `from`.
pub fn allowed_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::New => &[OrderStatus::InProgress, OrderStatus::Cancelled],
        OrderStatus::InProgress => &[OrderStatus::Delivered, OrderStatus::Cancelled],
        OrderStatus::Delivered | OrderStatus::Cancelled => &[],
    }
}

/// Returns true if no transition leaves `status`.
pub fn is_terminal(status: OrderStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Returns true if the state machine allows `from` → `to`.
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Like [`is_valid_transition`], but returns the domain error on rejection.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition { from, to })
    }
}

/// Method-style access to the transition table.
pub trait StatusTransitions {
    /// Statuses reachable in one step.
    fn allowed_transitions(&self) -> &'static [OrderStatus];

    /// Returns true if no transition leaves this status.
    fn is_terminal(&self) -> bool;

    /// Returns true if moving to `to` is allowed.
    fn can_transition_to(&self, to: OrderStatus) -> bool;
}

impl StatusTransitions for OrderStatus {
    fn allowed_transitions(&self) -> &'static [OrderStatus] {
        allowed_transitions(*self)
    }

    fn is_terminal(&self) -> bool {
        is_terminal(*self)
    }

    fn can_transition_to(&self, to: OrderStatus) -> bool {
        is_valid_transition(*self, to)
    }
}
