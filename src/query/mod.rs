//! Query builder
//!
//! A fluent, dialect-aware SQL builder split by concern:
//! - `builder`: core state and construction
//! - `types`: clause and operator types
//! - `where_clause`: WHERE / HAVING operations
//! - `select`: SELECT list and DISTINCT
//! - `joins`: JOIN operations
//! - `ordering`: ORDER BY and GROUP BY
//! - `pagination`: LIMIT / OFFSET helpers
//! - `sql_generation`: compilation into SQL plus bindings
//! - `execution`: driver-backed execution and hydration

pub mod builder;
pub mod execution;
pub mod joins;
pub mod ordering;
pub mod pagination;
pub mod select;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use types::{
    Combinator, DatePart, JoinClause, JoinType, OrderDirection, QueryOperator, WhereClause,
    WhereExpr,
};

pub(crate) use sql_generation::{compile_delete, compile_insert, compile_update};
