//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cache::CacheError;
use domain::OrderError;
use notifier::NotifyError;
use order_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error response body: `{"code": "...", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be decoded.
    BadRequest(String),
    /// Domain operation failed.
    Order(OrderError),
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_REQUEST",
                    message,
                },
            ),
            ApiError::Order(err) => order_error_to_response(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn order_error_to_response(err: OrderError) -> (StatusCode, ErrorBody) {
    let code = err.code();
    let status = match &err {
        OrderError::InvalidRequest(_)
        | OrderError::InvalidOrder(_)
        | OrderError::InvalidStatus(_)
        | OrderError::InvalidTransition { .. }
        | OrderError::InvalidPagination { .. } => StatusCode::BAD_REQUEST,
        OrderError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrderError::Conflict { .. } => StatusCode::CONFLICT,
        OrderError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Server-side failures are logged in full but not echoed to clients
    let message = if status.is_server_error() {
        tracing::error!(error = %err, code, "request failed");
        "failed to access order storage".to_string()
    } else {
        err.to_string()
    };

    (status, ErrorBody { code, message })
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Order(err)
    }
}

/// Failures while wiring collaborators at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("order store: {0}")]
    Store(#[from] StoreError),

    #[error("cache: {0}")]
    Cache(#[from] CacheError),

    #[error("notifier: {0}")]
    Notifier(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use common::{OrderId, OrderStatus};

    use super::*;

    fn render(err: OrderError) -> (StatusCode, ErrorBody) {
        ApiError::from(err).status_and_body()
    }

    #[test]
    fn client_errors_map_to_4xx() {
        let cases = [
            (OrderError::InvalidRequest("x".into()), 400, "INVALID_REQUEST"),
            (OrderError::InvalidOrder("x".into()), 400, "INVALID_ORDER"),
            (OrderError::InvalidStatus("X".into()), 400, "INVALID_STATUS"),
            (
                OrderError::InvalidTransition {
                    from: OrderStatus::Delivered,
                    to: OrderStatus::New,
                },
                400,
                "INVALID_TRANSITION",
            ),
            (
                OrderError::InvalidPagination { page: 0, limit: 10 },
                400,
                "INVALID_PAGINATION",
            ),
            (
                OrderError::OrderNotFound(OrderId::new("ORD-1")),
                404,
                "ORDER_NOT_FOUND",
            ),
            (
                OrderError::Conflict {
                    order_id: OrderId::new("ORD-1"),
                    expected: OrderStatus::New,
                    actual: OrderStatus::Cancelled,
                },
                409,
                "CONFLICT",
            ),
        ];

        for (err, status, code) in cases {
            let (actual_status, body) = render(err);
            assert_eq!(actual_status.as_u16(), status);
            assert_eq!(body.code, code);
        }
    }

    #[test]
    fn persistence_failure_hides_details() {
        let (status, body) = render(OrderError::PersistenceFailure(StoreError::Unavailable(
            "connection refused to 10.0.0.5".into(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "PERSISTENCE_FAILURE");
        assert!(!body.message.contains("10.0.0.5"));
    }

    #[test]
    fn bad_request_is_always_400() {
        let response = ApiError::BadRequest("missing field `status`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
