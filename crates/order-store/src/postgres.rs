use async_trait::async_trait;
use common::OrderItem;
use sqlx::types::Json;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::{
    NewOrder, Order, OrderId, OrderQuery, OrderStatus, Result, StoreError,
    store::{OrderStore, StatusUpdate},
};

/// Attempts at finding an unused identifier before giving up on an insert.
const MAX_ID_ATTEMPTS: usize = 3;

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url` and runs pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let items: Json<Vec<OrderItem>> = row.try_get("items")?;

        Ok(Order {
            id: OrderId::new(row.try_get::<String, _>("order_id")?),
            customer_id: row.try_get("customer_id")?,
            status: status.parse()?,
            items: items.0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn current_status(&self, order_id: &OrderId) -> Result<Option<OrderStatus>> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE order_id = $1")
                .bind(order_id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(status.map(|s| s.parse::<OrderStatus>()).transpose()?)
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let id = OrderId::generate();

            let result = sqlx::query(
                r#"
                INSERT INTO orders (order_id, customer_id, status, items, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(id.as_str())
            .bind(&order.customer_id)
            .bind(order.status.as_str())
            .bind(Json(&order.items))
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => return Ok(order.with_id(id)),
                Err(sqlx::Error::Database(ref db_err))
                    if db_err.constraint() == Some("orders_pkey")
                        && attempt < MAX_ID_ATTEMPTS =>
                {
                    tracing::warn!(order_id = %id, attempt, "order id collision, regenerating");
                }
                Err(e) => return Err(StoreError::Database(e)),
            }
        }
    }

    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT order_id, customer_id, status, items, created_at, updated_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<()> {
        let mut sql =
            String::from("UPDATE orders SET status = $1, updated_at = $2 WHERE order_id = $3");
        if update.expected_status.is_some() {
            sql.push_str(" AND status = $4");
        }

        let mut query = sqlx::query(&sql)
            .bind(update.new_status.as_str())
            .bind(update.updated_at)
            .bind(update.order_id.as_str());
        if let Some(expected) = update.expected_status {
            query = query.bind(expected.as_str());
        }

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing matched: tell a vanished order apart from a lost race
        match (self.current_status(&update.order_id).await?, update.expected_status) {
            (Some(actual), Some(expected)) => Err(StoreError::StatusConflict {
                order_id: update.order_id,
                expected,
                actual,
            }),
            _ => Err(StoreError::NotFound(update.order_id)),
        }
    }

    async fn list(&self, query: OrderQuery) -> Result<Vec<Order>> {
        let mut sql = String::from(
            "SELECT order_id, customer_id, status, items, created_at, updated_at FROM orders WHERE 1=1",
        );
        let mut param_count = 0;

        if query.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }
        if query.customer_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND customer_id = ${param_count}"));
        }

        sql.push_str(" ORDER BY created_at DESC, order_id DESC");
        sql.push_str(&format!(
            " LIMIT ${} OFFSET ${}",
            param_count + 1,
            param_count + 2
        ));

        let mut sqlx_query = sqlx::query(&sql);
        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(customer_id) = query.customer_id {
            sqlx_query = sqlx_query.bind(customer_id);
        }
        sqlx_query = sqlx_query
            .bind(query.limit as i64)
            .bind(query.offset as i64);

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }
}
