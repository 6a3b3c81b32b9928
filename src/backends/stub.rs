//! Stub Driver - Recording test double
//!
//! Records every statement it executes and serves canned result sets
//! from a queue. The integration suites use the statement log to assert
//! query-count contracts (one batched query per eager-loaded relation,
//! no SQL for keyless deletes) without a live database.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Driver, Row, SqlDialect};
use crate::error::OrmResult;

/// A statement the stub has executed
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub bindings: Vec<Value>,
}

/// In-memory recording driver
#[derive(Debug, Default)]
pub struct StubDriver {
    dialect: Option<SqlDialect>,
    log: Mutex<Vec<RecordedStatement>>,
    results: Mutex<VecDeque<Vec<Row>>>,
    next_insert_id: Mutex<i64>,
}

impl StubDriver {
    pub fn new() -> Self {
        Self {
            dialect: None,
            log: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            next_insert_id: Mutex::new(0),
        }
    }

    /// Use a specific dialect instead of the default backtick/`?` style
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Queue a result set; each `fetch_all` pops the next one
    pub fn push_result(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    /// Every statement executed so far, in order
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.log.lock().unwrap().clone()
    }

    /// Number of statements executed so far
    pub fn statement_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Clear the statement log
    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn record(&self, sql: &str, bindings: &[Value]) {
        self.log.lock().unwrap().push(RecordedStatement {
            sql: sql.to_string(),
            bindings: bindings.to_vec(),
        });
    }
}

#[async_trait]
impl Driver for StubDriver {
    fn dialect(&self) -> SqlDialect {
        self.dialect.clone().unwrap_or(SqlDialect::MySql)
    }

    async fn fetch_all(&self, sql: &str, bindings: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, bindings);
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn execute(&self, sql: &str, bindings: &[Value]) -> OrmResult<u64> {
        self.record(sql, bindings);
        Ok(1)
    }

    async fn insert(&self, sql: &str, bindings: &[Value]) -> OrmResult<(u64, Option<i64>)> {
        self.record(sql, bindings);
        let mut next = self.next_insert_id.lock().unwrap();
        *next += 1;
        Ok((1, Some(*next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_statements_and_serves_canned_rows() {
        let driver = StubDriver::new();
        driver.push_result(vec![Row::from([("id", json!(1))])]);

        let rows = driver.fetch_all("SELECT 1", &[json!(5)]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(driver.statement_count(), 1);
        assert_eq!(driver.statements()[0].bindings, vec![json!(5)]);

        // Queue exhausted: empty result, statement still recorded
        let rows = driver.fetch_all("SELECT 2", &[]).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(driver.statement_count(), 2);
    }

    #[tokio::test]
    async fn insert_hands_back_the_key_with_the_statement() {
        let driver = StubDriver::new();

        // The key arrives in the same call as the INSERT; no separate
        // lookup that another statement could interleave with
        let (affected, key) = driver
            .insert("INSERT INTO t (a) VALUES (?)", &[])
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(key, Some(1));

        let (_, key) = driver
            .insert("INSERT INTO t (a) VALUES (?)", &[])
            .await
            .unwrap();
        assert_eq!(key, Some(2));

        // Non-insert statements never advance the key counter
        driver.execute("UPDATE t SET a = ?", &[]).await.unwrap();
        let (_, key) = driver
            .insert("INSERT INTO t (a) VALUES (?)", &[])
            .await
            .unwrap();
        assert_eq!(key, Some(3));
        assert_eq!(driver.statement_count(), 4);
    }
}
