//! Query Builder WHERE clause operations
//!
//! Clauses accumulate in insertion order; each clause's combinator
//! applies against the accumulated expression to its left, and the
//! first clause never emits a leading combinator keyword.

use serde_json::Value;

use super::builder::QueryBuilder;
use super::types::*;

impl<M> QueryBuilder<M> {
    fn push_where(mut self, combinator: Combinator, expr: WhereExpr) -> Self {
        self.wheres.push(WhereClause { combinator, expr });
        self
    }

    /// Add WHERE condition with equality
    pub fn where_eq<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::Equal,
                value: value.into(),
            },
        )
    }

    /// Add OR WHERE condition with equality
    pub fn or_where_eq<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_where(
            Combinator::Or,
            WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::Equal,
                value: value.into(),
            },
        )
    }

    /// Add WHERE condition with a custom operator string; unknown
    /// operators fall back to `=`
    pub fn where_condition<T: Into<Value>>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::parse(operator),
                value: value.into(),
            },
        )
    }

    /// Add OR WHERE condition with a custom operator string
    pub fn or_where_condition<T: Into<Value>>(
        self,
        column: &str,
        operator: &str,
        value: T,
    ) -> Self {
        self.push_where(
            Combinator::Or,
            WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::parse(operator),
                value: value.into(),
            },
        )
    }

    /// Add one equality condition per (column, value) pair, all ANDed
    pub fn where_map<T: Into<Value>>(
        mut self,
        pairs: impl IntoIterator<Item = (&'static str, T)>,
    ) -> Self {
        for (column, value) in pairs {
            self = self.where_eq(column, value);
        }
        self
    }

    /// Add WHERE condition with LIKE
    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::Like,
                value: Value::String(pattern.to_string()),
            },
        )
    }

    /// Add WHERE condition with IN. An empty list compiles to a
    /// constant that matches zero rows, never "all rows".
    pub fn where_in<T: Into<Value>>(self, column: &str, values: Vec<T>) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::In {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
                negated: false,
            },
        )
    }

    /// Add WHERE condition with NOT IN; an empty list is a no-op clause
    pub fn where_not_in<T: Into<Value>>(self, column: &str, values: Vec<T>) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::In {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
                negated: true,
            },
        )
    }

    /// Add WHERE condition with BETWEEN
    pub fn where_between<T: Into<Value>>(self, column: &str, low: T, high: T) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Between {
                column: column.to_string(),
                low: low.into(),
                high: high.into(),
                negated: false,
            },
        )
    }

    /// Add WHERE condition with NOT BETWEEN
    pub fn where_not_between<T: Into<Value>>(self, column: &str, low: T, high: T) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Between {
                column: column.to_string(),
                low: low.into(),
                high: high.into(),
                negated: true,
            },
        )
    }

    /// Add WHERE condition with IS NULL
    pub fn where_null(self, column: &str) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Null {
                column: column.to_string(),
                negated: false,
            },
        )
    }

    /// Add WHERE condition with IS NOT NULL
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Null {
                column: column.to_string(),
                negated: true,
            },
        )
    }

    /// Compare the date part of a column against a calendar date
    pub fn where_date(self, column: &str, date: chrono::NaiveDate) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::DatePart {
                part: DatePart::Date,
                column: column.to_string(),
                value: Value::String(date.to_string()),
            },
        )
    }

    /// Compare the month part (1-12) of a column
    pub fn where_month(self, column: &str, month: u32) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::DatePart {
                part: DatePart::Month,
                column: column.to_string(),
                value: Value::Number(month.into()),
            },
        )
    }

    /// Compare the year part of a column
    pub fn where_year(self, column: &str, year: i32) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::DatePart {
                part: DatePart::Year,
                column: column.to_string(),
                value: Value::Number(year.into()),
            },
        )
    }

    /// Compare two columns; the right-hand side is an identifier, never
    /// a literal
    pub fn where_column(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::ColumnComparison {
                first: first.to_string(),
                operator: QueryOperator::parse(operator),
                second: second.to_string(),
            },
        )
    }

    /// Add a raw WHERE fragment with its own positional bindings
    pub fn where_raw<T: Into<Value>>(self, sql: &str, bindings: Vec<T>) -> Self {
        self.push_where(
            Combinator::And,
            WhereExpr::Raw {
                sql: sql.to_string(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Multi-column search: one pre-grouped `(a LIKE ? OR b LIKE ?)`
    /// block combined with AND against the rest of the chain
    pub fn search(self, term: &str, columns: &[&str]) -> Self {
        if columns.is_empty() {
            return self;
        }

        let pattern = format!("%{}%", term);
        let clauses = columns
            .iter()
            .enumerate()
            .map(|(i, column)| WhereClause {
                combinator: if i == 0 { Combinator::And } else { Combinator::Or },
                expr: WhereExpr::Comparison {
                    column: column.to_string(),
                    operator: QueryOperator::Like,
                    value: Value::String(pattern.clone()),
                },
            })
            .collect();

        self.push_where(Combinator::And, WhereExpr::Group(clauses))
    }

    /// Add HAVING condition with a custom operator string
    pub fn having<T: Into<Value>>(mut self, column: &str, operator: &str, value: T) -> Self {
        self.havings.push(WhereClause {
            combinator: Combinator::And,
            expr: WhereExpr::Comparison {
                column: column.to_string(),
                operator: QueryOperator::parse(operator),
                value: value.into(),
            },
        });
        self
    }
}
