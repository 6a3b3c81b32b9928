//! PostgreSQL Driver - sqlx-backed driver implementation
//!
//! Wraps a `sqlx::PgPool` behind the [`Driver`] contract. JSON attribute
//! values bind with native Postgres types where one can be recovered
//! (integers, floats, booleans, uuids, timestamps); everything else
//! binds as text or jsonb.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{Column, Pool, Postgres, Row as SqlxRow, TypeInfo};

use super::{Driver, Row, SqlDialect};
use crate::config::DatabaseConfig;
use crate::error::{ModelError, OrmResult, PoolError};
use crate::model::AttributeMap;

/// Driver backed by a sqlx Postgres connection pool
#[derive(Debug, Clone)]
pub struct PostgresDriver {
    pool: Pool<Postgres>,
}

impl PostgresDriver {
    /// Wrap an existing pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect using the supplied configuration
    pub async fn connect(config: &DatabaseConfig) -> OrmResult<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.acquire_timeout_seconds,
            ))
            .connect(&config.url)
            .await
            .map_err(PoolError::AcquisitionFailed)?;

        tracing::info!(
            max_connections = config.max_connections,
            "database pool created"
        );

        Ok(Self { pool })
    }

    /// Access the underlying pool
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    fn bind_value<'q>(
        query: sqlx::query::Query<'q, Postgres, PgArguments>,
        value: &Value,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    query.bind(f)
                } else {
                    query.bind(n.to_string())
                }
            }
            Value::String(s) => {
                // Recover native types where the text form is unambiguous
                if let Ok(id) = uuid::Uuid::parse_str(s) {
                    query.bind(id)
                } else if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(s) {
                    query.bind(ts.with_timezone(&chrono::Utc))
                } else {
                    query.bind(s.clone())
                }
            }
            Value::Array(_) | Value::Object(_) => {
                query.bind(sqlx::types::Json(value.clone()))
            }
        }
    }

    fn row_to_attributes(row: &PgRow) -> OrmResult<AttributeMap> {
        let mut attrs = AttributeMap::new();
        for (index, column) in row.columns().iter().enumerate() {
            attrs.set(column.name(), Self::decode_column(row, index, column)?);
        }
        Ok(attrs)
    }

    fn decode_column(
        row: &PgRow,
        index: usize,
        column: &sqlx::postgres::PgColumn,
    ) -> OrmResult<Value> {
        let value = match column.type_info().name() {
            "BOOL" => row
                .try_get::<Option<bool>, _>(index)?
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            "INT2" | "INT4" | "INT8" => row
                .try_get::<Option<i64>, _>(index)?
                .map(|i| Value::Number(i.into()))
                .unwrap_or(Value::Null),
            "FLOAT4" | "FLOAT8" | "NUMERIC" => row
                .try_get::<Option<f64>, _>(index)?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            "UUID" => row
                .try_get::<Option<uuid::Uuid>, _>(index)?
                .map(|u| Value::String(u.to_string()))
                .unwrap_or(Value::Null),
            "TIMESTAMPTZ" | "TIMESTAMP" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
                .map(|ts| Value::String(ts.to_rfc3339()))
                .unwrap_or(Value::Null),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(index)?
                .map(|d| Value::String(d.to_string()))
                .unwrap_or(Value::Null),
            "JSON" | "JSONB" => row
                .try_get::<Option<Value>, _>(index)?
                .unwrap_or(Value::Null),
            _ => row
                .try_get::<Option<String>, _>(index)?
                .map(Value::String)
                .unwrap_or(Value::Null),
        };
        Ok(value)
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    async fn fetch_all(&self, sql: &str, bindings: &[Value]) -> OrmResult<Vec<Row>> {
        tracing::debug!(sql, bindings = bindings.len(), "executing query");

        let mut query = sqlx::query(sql);
        for value in bindings {
            query = Self::bind_value(query, value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_attributes).collect()
    }

    async fn execute(&self, sql: &str, bindings: &[Value]) -> OrmResult<u64> {
        tracing::debug!(sql, bindings = bindings.len(), "executing statement");

        let mut query = sqlx::query(sql);
        for value in bindings {
            query = Self::bind_value(query, value);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, sql: &str, bindings: &[Value]) -> OrmResult<(u64, Option<i64>)> {
        tracing::debug!(sql, bindings = bindings.len(), "executing insert");

        // Hold one connection for the INSERT and the key lookup.
        // lastval() is per-session, so both statements must run on the
        // same connection; releasing it in between could hand the
        // session to a concurrent insert.
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(PoolError::AcquisitionFailed)?;

        let mut query = sqlx::query(sql);
        for value in bindings {
            query = Self::bind_value(query, value);
        }
        let result = query.execute(&mut *conn).await?;

        // lastval() errors when no sequence fired in this session; that
        // means there is no generated key to report
        let key = match sqlx::query("SELECT lastval()").fetch_one(&mut *conn).await {
            Ok(row) => row
                .try_get::<i64, _>(0)
                .map_err(|e| ModelError::Database(e.to_string()))
                .map(Some)?,
            Err(_) => None,
        };

        Ok((result.rows_affected(), key))
    }
}
