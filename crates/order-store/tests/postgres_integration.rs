//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, DurationRound, Utc};
use common::{Money, NewOrder, OrderItem};
use order_store::{
    OrderId, OrderQuery, OrderStatus, OrderStore, PostgresOrderStore, StatusUpdate, StoreError,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_orders_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

/// Postgres keeps microsecond precision, so test timestamps are truncated up front.
fn new_order(customer_id: &str, minutes_ago: i64) -> NewOrder {
    let created_at = (Utc::now() - Duration::minutes(minutes_ago))
        .duration_trunc(Duration::microseconds(1))
        .unwrap();
    NewOrder {
        customer_id: customer_id.to_string(),
        status: OrderStatus::New,
        items: vec![
            OrderItem::new("SKU-001", 2, Money::from_cents(1000)),
            OrderItem::new("SKU-002", 1, Money::from_cents(250)),
        ],
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
#[serial]
async fn insert_and_find_order() {
    let store = get_test_store().await;

    let inserted = store.insert(new_order("C1", 0)).await.unwrap();
    assert!(inserted.id.as_str().starts_with("ORD-"));

    let found = store.find_by_id(&inserted.id).await.unwrap().unwrap();
    assert_eq!(found, inserted);
    assert_eq!(found.items.len(), 2);
    assert_eq!(found.total_amount().cents(), 2250);
}

#[tokio::test]
#[serial]
async fn find_missing_order_returns_none() {
    let store = get_test_store().await;
    let found = store.find_by_id(&OrderId::new("ORD-missing")).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[serial]
async fn conditional_update_applies_when_status_matches() {
    let store = get_test_store().await;
    let order = store.insert(new_order("C1", 5)).await.unwrap();
    let now = Utc::now().duration_trunc(Duration::microseconds(1)).unwrap();

    store
        .update_status(
            StatusUpdate::new(order.id.clone(), OrderStatus::InProgress, now)
                .expect_current(OrderStatus::New),
        )
        .await
        .unwrap();

    let found = store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(found.status, OrderStatus::InProgress);
    assert_eq!(found.updated_at, now);
    assert_eq!(found.created_at, order.created_at);
}

#[tokio::test]
#[serial]
async fn conditional_update_conflicts_on_stale_status() {
    let store = get_test_store().await;
    let order = store.insert(new_order("C1", 0)).await.unwrap();

    let result = store
        .update_status(
            StatusUpdate::new(order.id.clone(), OrderStatus::Delivered, Utc::now())
                .expect_current(OrderStatus::InProgress),
        )
        .await;

    assert!(matches!(
        result,
        Err(StoreError::StatusConflict {
            actual: OrderStatus::New,
            ..
        })
    ));

    let found = store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(found.status, OrderStatus::New);
}

#[tokio::test]
#[serial]
async fn update_unknown_order_is_not_found() {
    let store = get_test_store().await;

    let result = store
        .update_status(
            StatusUpdate::new(OrderId::new("ORD-missing"), OrderStatus::Cancelled, Utc::now())
                .expect_current(OrderStatus::New),
        )
        .await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn list_filters_and_orders_newest_first() {
    let store = get_test_store().await;
    let c1_old = store.insert(new_order("C1", 30)).await.unwrap();
    let c1_new = store.insert(new_order("C1", 1)).await.unwrap();
    let c2 = store.insert(new_order("C2", 10)).await.unwrap();

    store
        .update_status(StatusUpdate::new(
            c1_old.id.clone(),
            OrderStatus::Cancelled,
            Utc::now(),
        ))
        .await
        .unwrap();

    let all = store.list(OrderQuery::new()).await.unwrap();
    let ids: Vec<_> = all.iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, vec![c1_new.id.clone(), c2.id.clone(), c1_old.id.clone()]);

    let c1 = store
        .list(OrderQuery::new().customer_id("C1"))
        .await
        .unwrap();
    assert_eq!(c1.len(), 2);

    let c1_new_only = store
        .list(OrderQuery::new().customer_id("C1").status(OrderStatus::New))
        .await
        .unwrap();
    assert_eq!(c1_new_only.len(), 1);
    assert_eq!(c1_new_only[0].id, c1_new.id);

    let none = store
        .list(OrderQuery::new().customer_id("C3"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn list_paginates() {
    let store = get_test_store().await;
    for i in 0..25 {
        store.insert(new_order("C1", 100 - i)).await.unwrap();
    }

    let all = store.list(OrderQuery::new().limit(100)).await.unwrap();
    assert_eq!(all.len(), 25);

    let page2 = store.list(OrderQuery::page(2, 10)).await.unwrap();
    assert_eq!(page2, all[10..20].to_vec());

    let page3 = store.list(OrderQuery::page(3, 10)).await.unwrap();
    assert_eq!(page3.len(), 5);
}

#[tokio::test]
#[serial]
async fn migrations_are_idempotent() {
    let store = get_test_store().await;
    sqlx::raw_sql(include_str!(
        "../../../migrations/001_create_orders_table.sql"
    ))
    .execute(store.pool())
    .await
    .unwrap();
}

#[tokio::test]
#[serial]
async fn connect_applies_migrations() {
    let info = get_container_info().await;

    let store = PostgresOrderStore::connect(&info.connection_string, 2)
        .await
        .unwrap();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert!(applied >= 1);
}
