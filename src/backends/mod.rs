//! Database Backend Abstraction
//!
//! Defines the driver contract the ORM consumes and the SQL dialect
//! seam for identifier quoting and parameter placeholders. Every value
//! reaches the driver through the bindings slice; the compiler never
//! inlines values as escaped literals.

pub mod postgres;
pub mod stub;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::OrmResult;
use crate::model::AttributeMap;

pub use postgres::PostgresDriver;
pub use stub::StubDriver;

/// A result row: an ordered column-to-value map
pub type Row = AttributeMap;

/// SQL dialect for generating database-specific SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Postgres,
    Sqlite,
}

impl SqlDialect {
    /// Parameter placeholder for the zero-based binding index
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${}", index + 1),
            SqlDialect::MySql | SqlDialect::Sqlite => "?".to_string(),
        }
    }

    /// Quote character for identifiers in this dialect
    pub fn identifier_quote(&self) -> char {
        match self {
            SqlDialect::MySql => '`',
            SqlDialect::Postgres | SqlDialect::Sqlite => '"',
        }
    }

    /// Quote an identifier, doubling embedded quote characters.
    /// Dotted names quote each segment separately; `*` passes through.
    pub fn quote_identifier(&self, identifier: &str) -> String {
        let quote = self.identifier_quote();
        identifier
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    let escaped =
                        segment.replace(quote, &format!("{}{}", quote, quote));
                    format!("{}{}{}", quote, escaped, quote)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Predicate head comparing the date part of a column; the caller
    /// appends the placeholder
    pub fn date_predicate(&self, quoted_column: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("CAST({} AS DATE) = ", quoted_column),
            SqlDialect::MySql | SqlDialect::Sqlite => format!("DATE({}) = ", quoted_column),
        }
    }

    /// Predicate head comparing the month part of a column
    pub fn month_predicate(&self, quoted_column: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("EXTRACT(MONTH FROM {}) = ", quoted_column),
            SqlDialect::MySql => format!("MONTH({}) = ", quoted_column),
            SqlDialect::Sqlite => {
                format!("CAST(strftime('%m', {}) AS INTEGER) = ", quoted_column)
            }
        }
    }

    /// Predicate head comparing the year part of a column
    pub fn year_predicate(&self, quoted_column: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("EXTRACT(YEAR FROM {}) = ", quoted_column),
            SqlDialect::MySql => format!("YEAR({}) = ", quoted_column),
            SqlDialect::Sqlite => {
                format!("CAST(strftime('%Y', {}) AS INTEGER) = ", quoted_column)
            }
        }
    }
}

/// Driver contract consumed by the query builder and model layer.
///
/// Statement execution is serialized per physical connection by the
/// implementation; callers await until the driver returns.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Dialect used when compiling SQL for this driver
    fn dialect(&self) -> SqlDialect;

    /// Execute a statement and return the result rows
    async fn fetch_all(&self, sql: &str, bindings: &[Value]) -> OrmResult<Vec<Row>>;

    /// Execute a statement and return the affected row count
    async fn execute(&self, sql: &str, bindings: &[Value]) -> OrmResult<u64>;

    /// Execute an INSERT and return the affected row count plus the
    /// generated key. The key must be captured atomically with the
    /// statement: on pooled backends both belong to one connection, so
    /// a concurrent insert can never leak its key into this result.
    async fn insert(&self, sql: &str, bindings: &[Value]) -> OrmResult<(u64, Option<i64>)>;
}
