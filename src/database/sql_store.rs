//! sqlx-backed implementations of [`Store`].
//!
//! Both backends accept the same statement text: positional `$N` parameters
//! are native to PostgreSQL and understood by sqlx's SQLite driver.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _};
use tracing::info;

use super::manager::StoreOptions;
use super::store::{check_params, DataError, Row, Store, WriteResult};

/// Bind one scalar JSON value onto a sqlx query
macro_rules! bind_value {
    ($query:ident, $value:expr) => {
        match $value {
            Value::Null => $query.bind(None::<String>),
            Value::Bool(b) => $query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    $query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            Value::String(s) => $query.bind(s.clone()),
            // rejected earlier by check_params
            Value::Array(_) | Value::Object(_) => $query,
        }
    };
}

/// Convert a backend row into a column -> value map, trying the scalar
/// types our tables use before giving up with null
macro_rules! row_to_map {
    ($fn_name:ident, $row_ty:ty) => {
        fn $fn_name(row: &$row_ty) -> Row {
            let mut map = Row::new();
            for i in 0..row.len() {
                let column_name = row.column(i).name().to_string();
                let json_value = if let Ok(v) = row.try_get::<Option<String>, _>(i) {
                    v.map(Value::String).unwrap_or(Value::Null)
                } else if let Ok(v) = row.try_get::<Option<i64>, _>(i) {
                    v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null)
                } else if let Ok(v) = row.try_get::<Option<i32>, _>(i) {
                    v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null)
                } else if let Ok(v) = row.try_get::<Option<f64>, _>(i) {
                    v.and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                } else if let Ok(v) = row.try_get::<Option<bool>, _>(i) {
                    v.map(Value::Bool).unwrap_or(Value::Null)
                } else {
                    Value::Null
                };
                map.insert(column_name, json_value);
            }
            map
        }
    };
}

row_to_map!(pg_row_to_map, PgRow);
row_to_map!(sqlite_row_to_map, SqliteRow);

/// PostgreSQL store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, options: &StoreOptions) -> Result<Self, DataError> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.connect_timeout)
            .connect(url)
            .await?;
        info!("Connected PostgreSQL pool (max_connections={})", options.max_connections);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteResult, DataError> {
        check_params(params)?;
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_value!(q, p);
        }
        let done = q.execute(&self.pool).await?;
        Ok(WriteResult {
            rows_affected: done.rows_affected(),
        })
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError> {
        check_params(params)?;
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_value!(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(pg_row_to_map).collect())
    }
}

/// SQLite store, used for local files and in-memory databases
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, options: &StoreOptions) -> Result<Self, DataError> {
        let connect_options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .acquire_timeout(options.connect_timeout)
                .connect_with(connect_options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(options.connect_timeout)
                .connect_with(connect_options)
                .await?
        };

        info!("Connected SQLite pool: {}", url);
        Ok(Self::new(pool))
    }

    /// Fresh private in-memory database
    pub async fn in_memory() -> Result<Self, DataError> {
        Self::connect("sqlite::memory:", &StoreOptions::default()).await
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteResult, DataError> {
        check_params(params)?;
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_value!(q, p);
        }
        let done = q.execute(&self.pool).await?;
        Ok(WriteResult {
            rows_affected: done.rows_affected(),
        })
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError> {
        check_params(params)?;
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_value!(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(sqlite_row_to_map).collect())
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
