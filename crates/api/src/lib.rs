//! HTTP API server for the order lifecycle service.
//!
//! Provides REST endpoints for creating, reading, listing and advancing
//! orders, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use cache::{Cache, InMemoryCache, NoopCache, RedisCache};
use domain::{OrderService, OrderServiceConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use notifier::{EventNotifier, InMemoryNotifier, KafkaConfig, KafkaNotifier};
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use error::StartupError;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// Requests running longer than `request_timeout` are aborted with 408.
pub fn create_app(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let orders_router = Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            get(routes::orders::list).post(routes::orders::create),
        )
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", patch(routes::orders::update_status))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/v1", orders_router)
        .merge(metrics_router)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed entirely by in-memory collaborators.
pub fn create_default_state(config: OrderServiceConfig) -> Arc<AppState> {
    create_state(
        Arc::new(InMemoryOrderStore::new()),
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryNotifier::new()),
        config,
    )
}

/// Creates application state from explicit collaborators.
pub fn create_state(
    store: Arc<dyn OrderStore>,
    cache: Arc<dyn Cache>,
    notifier: Arc<dyn EventNotifier>,
    config: OrderServiceConfig,
) -> Arc<AppState> {
    Arc::new(AppState {
        order_service: OrderService::new(store, cache, notifier, config),
    })
}

/// Connects the collaborators selected by `config`.
///
/// Each backend falls back to its in-memory implementation when its URL is
/// not configured.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let store: Arc<dyn OrderStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresOrderStore::connect(url, config.database_max_connections).await?;
            tracing::info!("connected to PostgreSQL order store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    let cache: Arc<dyn Cache> = match (&config.redis_url, config.cache_enabled) {
        (_, false) => {
            tracing::info!("order cache disabled");
            Arc::new(NoopCache)
        }
        (Some(url), true) => Arc::new(RedisCache::new(url).await?),
        (None, true) => {
            tracing::warn!("REDIS_URL not set, using in-memory order cache");
            Arc::new(InMemoryCache::new())
        }
    };

    let notifier: Arc<dyn EventNotifier> = match &config.kafka_brokers {
        Some(brokers) => {
            let kafka = KafkaNotifier::new(KafkaConfig {
                brokers: brokers.clone(),
                topic: config.kafka_topic.clone(),
                message_timeout: config.kafka_message_timeout,
            })?;
            kafka.ensure_topic().await;
            tracing::info!(topic = %kafka.topic(), "publishing order events to Kafka");
            Arc::new(kafka)
        }
        None => {
            tracing::warn!("KAFKA_BROKERS not set, order events are recorded in memory only");
            Arc::new(InMemoryNotifier::new())
        }
    };

    Ok(create_state(store, cache, notifier, config.service_config()))
}
