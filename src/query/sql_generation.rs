//! Query Builder SQL generation
//!
//! Compiles accumulated builder state into one SQL statement plus an
//! ordered binding list. Every value is bound through a placeholder:
//! scalar comparisons, IN lists, BETWEEN bounds, and raw-fragment
//! bindings alike. Nothing is inlined as an escaped literal.

use serde_json::Value;

use super::builder::QueryBuilder;
use super::select::looks_like_expression;
use super::types::*;
use crate::backends::SqlDialect;
use crate::error::{ModelError, OrmResult};
use crate::model::AttributeMap;

impl<M> QueryBuilder<M> {
    /// Compile against the builder's own dialect
    pub fn to_sql_with_params(&self) -> OrmResult<(String, Vec<Value>)> {
        self.compile(&self.dialect)
    }

    /// Compiled SQL text only
    pub fn to_sql(&self) -> OrmResult<String> {
        Ok(self.to_sql_with_params()?.0)
    }

    /// Compile a SELECT for the given dialect
    pub(crate) fn compile(&self, dialect: &SqlDialect) -> OrmResult<(String, Vec<Value>)> {
        let mut sql = String::new();
        let mut params = Vec::new();

        sql.push_str(if self.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });

        if self.select_columns.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = self
                .select_columns
                .iter()
                .map(|c| quote_column(dialect, c))
                .collect();
            sql.push_str(&columns.join(", "));
        }

        if let Some(table) = &self.table {
            sql.push_str(" FROM ");
            sql.push_str(&dialect.quote_identifier(table));
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.join_type.to_string());
            sql.push(' ');
            sql.push_str(&dialect.quote_identifier(&join.table));
            if let Some((left, right)) = &join.on {
                sql.push_str(" ON ");
                sql.push_str(&dialect.quote_identifier(left));
                sql.push_str(" = ");
                sql.push_str(&dialect.quote_identifier(right));
            }
        }

        push_where_list(&mut sql, &mut params, " WHERE ", &self.wheres, dialect)?;

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            let columns: Vec<String> = self
                .group_by
                .iter()
                .map(|c| quote_column(dialect, c))
                .collect();
            sql.push_str(&columns.join(", "));
        }

        push_where_list(&mut sql, &mut params, " HAVING ", &self.havings, dialect)?;

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| {
                    format!("{} {}", quote_column(dialect, column), direction)
                })
                .collect();
            sql.push_str(&clauses.join(", "));
        }

        if let Some(limit) = self.limit_count {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset_value {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok((sql, params))
    }

    /// Compile a single-value aggregate reusing the accumulated WHERE
    /// and join state; select, ordering, and pagination are dropped.
    pub(crate) fn compile_aggregate(
        &self,
        expression: &str,
        dialect: &SqlDialect,
    ) -> OrmResult<(String, Vec<Value>)> {
        let mut stripped = self.clone();
        stripped.select_columns = vec![format!("{} AS aggregate", expression)];
        stripped.distinct = false;
        stripped.order_by.clear();
        stripped.limit_count = None;
        stripped.offset_value = None;
        stripped.compile(dialect)
    }
}

/// Quote a select/group/order column unless it reads as a SQL expression
pub(crate) fn quote_column(dialect: &SqlDialect, column: &str) -> String {
    if looks_like_expression(column) {
        column.to_string()
    } else {
        dialect.quote_identifier(column)
    }
}

fn push_where_list(
    sql: &mut String,
    params: &mut Vec<Value>,
    keyword: &str,
    clauses: &[WhereClause],
    dialect: &SqlDialect,
) -> OrmResult<()> {
    if clauses.is_empty() {
        return Ok(());
    }
    sql.push_str(keyword);
    push_clauses(sql, params, clauses, dialect)
}

fn push_clauses(
    sql: &mut String,
    params: &mut Vec<Value>,
    clauses: &[WhereClause],
    dialect: &SqlDialect,
) -> OrmResult<()> {
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
            sql.push_str(&clause.combinator.to_string());
            sql.push(' ');
        }
        push_expr(sql, params, &clause.expr, dialect)?;
    }
    Ok(())
}

fn push_expr(
    sql: &mut String,
    params: &mut Vec<Value>,
    expr: &WhereExpr,
    dialect: &SqlDialect,
) -> OrmResult<()> {
    match expr {
        WhereExpr::Comparison {
            column,
            operator,
            value,
        } => {
            sql.push_str(&quote_column(dialect, column));
            sql.push(' ');
            sql.push_str(&operator.to_string());
            sql.push(' ');
            push_binding(sql, params, value.clone(), dialect);
        }
        WhereExpr::In {
            column,
            values,
            negated,
        } => {
            if values.is_empty() {
                // Zero-row constant for IN, no-op for NOT IN
                sql.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                return Ok(());
            }
            sql.push_str(&quote_column(dialect, column));
            sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                push_binding(sql, params, value.clone(), dialect);
            }
            sql.push(')');
        }
        WhereExpr::Between {
            column,
            low,
            high,
            negated,
        } => {
            sql.push_str(&quote_column(dialect, column));
            sql.push_str(if *negated {
                " NOT BETWEEN "
            } else {
                " BETWEEN "
            });
            push_binding(sql, params, low.clone(), dialect);
            sql.push_str(" AND ");
            push_binding(sql, params, high.clone(), dialect);
        }
        WhereExpr::Null { column, negated } => {
            sql.push_str(&quote_column(dialect, column));
            sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
        }
        WhereExpr::DatePart {
            part,
            column,
            value,
        } => {
            let quoted = quote_column(dialect, column);
            let head = match part {
                DatePart::Date => dialect.date_predicate(&quoted),
                DatePart::Month => dialect.month_predicate(&quoted),
                DatePart::Year => dialect.year_predicate(&quoted),
            };
            sql.push_str(&head);
            push_binding(sql, params, value.clone(), dialect);
        }
        WhereExpr::ColumnComparison {
            first,
            operator,
            second,
        } => {
            sql.push_str(&quote_column(dialect, first));
            sql.push(' ');
            sql.push_str(&operator.to_string());
            sql.push(' ');
            sql.push_str(&quote_column(dialect, second));
        }
        WhereExpr::Raw { sql: raw, bindings } => {
            // Each `?` marker consumes one binding; a count mismatch is
            // a caller error and must never compile into truncated SQL
            let markers = raw.matches('?').count();
            if markers != bindings.len() {
                return Err(ModelError::Query(format!(
                    "raw fragment '{}' has {} placeholder(s) but {} binding(s)",
                    raw,
                    markers,
                    bindings.len()
                )));
            }
            let mut pieces = raw.split('?');
            if let Some(first) = pieces.next() {
                sql.push_str(first);
            }
            for (piece, value) in pieces.zip(bindings.iter()) {
                push_binding(sql, params, value.clone(), dialect);
                sql.push_str(piece);
            }
        }
        WhereExpr::Group(clauses) => {
            sql.push('(');
            push_clauses(sql, params, clauses, dialect)?;
            sql.push(')');
        }
    }
    Ok(())
}

fn push_binding(sql: &mut String, params: &mut Vec<Value>, value: Value, dialect: &SqlDialect) {
    sql.push_str(&dialect.placeholder(params.len()));
    params.push(value);
}

/// Compile an INSERT of every attribute in insertion order
pub(crate) fn compile_insert(
    table: &str,
    attributes: &AttributeMap,
    dialect: &SqlDialect,
) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();

    for (column, value) in attributes.iter() {
        columns.push(dialect.quote_identifier(column));
        placeholders.push(dialect.placeholder(params.len()));
        params.push(value.clone());
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    );
    (sql, params)
}

/// Compile a single-row UPDATE by primary key
pub(crate) fn compile_update(
    table: &str,
    attributes: &AttributeMap,
    primary_key_name: &str,
    primary_key: Value,
    dialect: &SqlDialect,
) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let mut sets = Vec::new();

    for (column, value) in attributes.iter() {
        sets.push(format!(
            "{} = {}",
            dialect.quote_identifier(column),
            dialect.placeholder(params.len())
        ));
        params.push(value.clone());
    }

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.quote_identifier(table),
        sets.join(", "),
        dialect.quote_identifier(primary_key_name),
        dialect.placeholder(params.len())
    );
    params.push(primary_key);
    (sql, params)
}

/// Compile a single-row DELETE by primary key
pub(crate) fn compile_delete(
    table: &str,
    primary_key_name: &str,
    primary_key: Value,
    dialect: &SqlDialect,
) -> (String, Vec<Value>) {
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_identifier(table),
        dialect.quote_identifier(primary_key_name),
        dialect.placeholder(0)
    );
    (sql, vec![primary_key])
}
