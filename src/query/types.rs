//! Query Builder Types - Core types and enums for query building

use serde_json::Value;
use std::fmt;

/// Comparison operators for scalar WHERE conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
}

impl QueryOperator {
    /// Parse an operator string; unknown operators fall back to `=`
    pub fn parse(operator: &str) -> Self {
        match operator {
            "=" => QueryOperator::Equal,
            "!=" | "<>" => QueryOperator::NotEqual,
            ">" => QueryOperator::GreaterThan,
            ">=" => QueryOperator::GreaterThanOrEqual,
            "<" => QueryOperator::LessThan,
            "<=" => QueryOperator::LessThanOrEqual,
            "LIKE" | "like" => QueryOperator::Like,
            "NOT LIKE" | "not like" => QueryOperator::NotLike,
            _ => QueryOperator::Equal,
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::NotLike => write!(f, "NOT LIKE"),
        }
    }
}

/// How a clause combines with the accumulated expression to its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::And => write!(f, "AND"),
            Combinator::Or => write!(f, "OR"),
        }
    }
}

/// Date component compared by the `where_date` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Month,
    Year,
}

/// One WHERE expression variant
#[derive(Debug, Clone)]
pub enum WhereExpr {
    /// `column <op> ?`
    Comparison {
        column: String,
        operator: QueryOperator,
        value: Value,
    },
    /// `column [NOT] IN (?, ?, ...)`; empty lists compile to a
    /// zero-row (`1 = 0`) or no-op (`1 = 1`) constant
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `column [NOT] BETWEEN ? AND ?`
    Between {
        column: String,
        low: Value,
        high: Value,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    Null { column: String, negated: bool },
    /// Dialect-specific date-part comparison
    DatePart {
        part: DatePart,
        column: String,
        value: Value,
    },
    /// `first <op> second` where both sides are identifiers
    ColumnComparison {
        first: String,
        operator: QueryOperator,
        second: String,
    },
    /// Raw fragment with its own positional bindings
    Raw { sql: String, bindings: Vec<Value> },
    /// Pre-grouped parenthesized block (multi-column search)
    Group(Vec<WhereClause>),
}

/// One WHERE clause: an expression plus its combinator. The first
/// clause in a list never emits its combinator keyword.
#[derive(Debug, Clone)]
pub struct WhereClause {
    pub combinator: Combinator,
    pub expr: WhereExpr,
}

/// Join types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

/// Join clause; cross joins carry no ON condition
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub on: Option<(String, String)>,
}

/// Order by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// Parse a direction string; anything that is not DESC means ASC
    pub fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}
