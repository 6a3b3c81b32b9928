//! Lookup conditions for `find`-style operations
//!
//! A `Condition` is what callers pass to `find`/`find_all`: a bare
//! primary key, a map of column equalities, or a single explicit
//! comparison. Conversions keep the call sites terse.

use serde_json::Value;

use crate::query::{QueryBuilder, QueryOperator};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Match on the primary key column
    Key(Value),
    /// Match every `(column, value)` pair with equality, ANDed
    Map(Vec<(String, Value)>),
    /// One explicit comparison
    Expr {
        column: String,
        operator: QueryOperator,
        value: Value,
    },
}

impl Condition {
    /// Build an explicit comparison; unknown operator strings fall back
    /// to equality
    pub fn expr<T: Into<Value>>(column: &str, operator: &str, value: T) -> Self {
        Condition::Expr {
            column: column.to_string(),
            operator: QueryOperator::parse(operator),
            value: value.into(),
        }
    }

    /// Apply this condition to a query builder
    pub fn apply<M>(self, query: QueryBuilder<M>, primary_key_name: &str) -> QueryBuilder<M> {
        match self {
            Condition::Key(value) => query.where_eq(primary_key_name, value),
            Condition::Map(pairs) => pairs
                .into_iter()
                .fold(query, |q, (column, value)| q.where_eq(&column, value)),
            Condition::Expr {
                column,
                operator,
                value,
            } => query.where_condition(&column, &operator.to_string(), value),
        }
    }

    /// Human-readable rendering for not-found errors
    pub fn describe(&self, primary_key_name: &str) -> String {
        match self {
            Condition::Key(value) => format!("{} = {}", primary_key_name, value),
            Condition::Map(pairs) => pairs
                .iter()
                .map(|(column, value)| format!("{} = {}", column, value))
                .collect::<Vec<_>>()
                .join(" AND "),
            Condition::Expr {
                column,
                operator,
                value,
            } => format!("{} {} {}", column, operator, value),
        }
    }
}

impl From<i64> for Condition {
    fn from(key: i64) -> Self {
        Condition::Key(Value::from(key))
    }
}

impl From<i32> for Condition {
    fn from(key: i32) -> Self {
        Condition::Key(Value::from(key))
    }
}

impl From<&str> for Condition {
    fn from(key: &str) -> Self {
        Condition::Key(Value::from(key))
    }
}

impl From<String> for Condition {
    fn from(key: String) -> Self {
        Condition::Key(Value::from(key))
    }
}

impl From<uuid::Uuid> for Condition {
    fn from(key: uuid::Uuid) -> Self {
        Condition::Key(Value::from(key.to_string()))
    }
}

impl From<Value> for Condition {
    fn from(key: Value) -> Self {
        Condition::Key(key)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Condition {
    fn from(pairs: [(&str, Value); N]) -> Self {
        Condition::Map(
            pairs
                .into_iter()
                .map(|(column, value)| (column.to_string(), value))
                .collect(),
        )
    }
}

impl From<Vec<(String, Value)>> for Condition {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Condition::Map(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_condition_targets_the_primary_key() {
        let q: QueryBuilder<()> = Condition::from(7)
            .apply(QueryBuilder::new().from("users"), "id");
        let (sql, params) = q.to_sql_with_params().unwrap();
        assert_eq!(sql, "SELECT * FROM `users` WHERE `id` = ?");
        assert_eq!(params, vec![json!(7)]);
    }

    #[test]
    fn map_condition_ands_every_pair() {
        let condition = Condition::from([("email", json!("a@b.c")), ("active", json!(true))]);
        let q: QueryBuilder<()> = condition.apply(QueryBuilder::new().from("users"), "id");
        let (sql, _) = q.to_sql_with_params().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `users` WHERE `email` = ? AND `active` = ?"
        );
    }

    #[test]
    fn describe_reads_like_a_predicate() {
        assert_eq!(Condition::from(7).describe("id"), "id = 7");
        assert_eq!(
            Condition::expr("age", ">=", 18).describe("id"),
            "age >= 18"
        );
    }
}
