//! Order endpoints under `/api/v1/orders`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use cache::Cache;
use chrono::{DateTime, Utc};
use common::{Money, Order, OrderId, OrderItem};
use domain::{CreateOrder, ListOrders, OrderService, StatusChange};
use notifier::EventNotifier;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Order service wired with trait objects, so the concrete collaborators are
/// chosen at startup.
pub type DynOrderService =
    OrderService<Arc<dyn OrderStore>, Arc<dyn Cache>, Arc<dyn EventNotifier>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub order_service: DynOrderService,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    #[serde(default)]
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Page and limit are signed so negative values get the pagination error
/// rather than a decoding one.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdatedResponse {
    pub message: String,
    pub order_id: String,
    pub old_status: String,
    pub new_status: String,
    pub event_published: bool,
    pub cache_invalidated: bool,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total_cents = order.total_amount().cents();
        Self {
            id: order.id.to_string(),
            customer_id: order.customer_id,
            status: order.status.to_string(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    sku: item.sku.to_string(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            total_cents,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl From<StatusChange> for StatusUpdatedResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            message: "order status updated".to_string(),
            order_id: change.order_id().to_string(),
            old_status: change.old_status().to_string(),
            new_status: change.new_status().to_string(),
            event_published: change.notification.is_applied(),
            cache_invalidated: change.cache_invalidation.is_applied(),
        }
    }
}

// -- Handlers --

/// POST /api/v1/orders — create a new order.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) = payload.map_err(reject)?;

    let items = req
        .items
        .into_iter()
        .map(|item| {
            OrderItem::new(
                item.sku,
                item.quantity,
                Money::from_cents(item.unit_price_cents),
            )
        })
        .collect();

    let order = state
        .order_service
        .create_order(CreateOrder::new(req.customer_id, items))
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /api/v1/orders/{id} — get an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.order_service.get_order(&OrderId::new(id)).await?;
    Ok(Json(order.into()))
}

/// GET /api/v1/orders — list orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListOrdersParams>, QueryRejection>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let Query(params) = params.map_err(reject)?;

    let req = ListOrders {
        status: params.status,
        customer_id: params.customer_id,
        page: params.page.unwrap_or(1),
        limit: params.limit.unwrap_or(ListOrders::DEFAULT_LIMIT),
    };

    let orders = state.order_service.list_orders(req).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// PATCH /api/v1/orders/{id}/status — move an order to a new status.
#[tracing::instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<StatusUpdatedResponse>, ApiError> {
    let Json(req) = payload.map_err(reject)?;

    let change = state
        .order_service
        .update_status(&OrderId::new(id), &req.status)
        .await?;

    Ok(Json(change.into()))
}

fn reject<R: std::fmt::Display>(rejection: R) -> ApiError {
    ApiError::BadRequest(rejection.to_string())
}
