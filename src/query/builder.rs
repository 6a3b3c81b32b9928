//! Query Builder - Core builder implementation

use std::marker::PhantomData;

use super::types::*;
use crate::backends::SqlDialect;

/// Fluent builder that accumulates query intent and compiles it into one
/// parameterized SQL statement plus an ordered binding list.
///
/// A builder is single-owner state; chains mutate clause lists in place
/// and must not be shared across concurrent chains.
#[derive(Debug)]
pub struct QueryBuilder<M = ()> {
    pub(crate) table: Option<String>,
    pub(crate) dialect: SqlDialect,
    pub(crate) select_columns: Vec<String>,
    pub(crate) distinct: bool,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) group_by: Vec<String>,
    pub(crate) havings: Vec<WhereClause>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) offset_value: Option<i64>,
    pub(crate) eager: Vec<String>,
    _phantom: PhantomData<M>,
}

impl<M> Clone for QueryBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            dialect: self.dialect.clone(),
            select_columns: self.select_columns.clone(),
            distinct: self.distinct,
            wheres: self.wheres.clone(),
            joins: self.joins.clone(),
            group_by: self.group_by.clone(),
            havings: self.havings.clone(),
            order_by: self.order_by.clone(),
            limit_count: self.limit_count,
            offset_value: self.offset_value,
            eager: self.eager.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<M> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> QueryBuilder<M> {
    /// Create a new query builder
    pub fn new() -> Self {
        Self {
            table: None,
            dialect: SqlDialect::MySql,
            select_columns: Vec::new(),
            distinct: false,
            wheres: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            havings: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            offset_value: None,
            eager: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Set the target table
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Override the compilation dialect (defaults to backtick/`?` style)
    pub fn dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Queue a relationship name for eager loading after hydration
    pub fn with(mut self, relation: &str) -> Self {
        self.eager.push(relation.to_string());
        self
    }

    /// Target table, when set
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Queued eager-load relation names
    pub fn eager_relations(&self) -> &[String] {
        &self.eager
    }
}
