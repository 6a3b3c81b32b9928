//! Query Builder JOIN operations

use super::builder::QueryBuilder;
use super::types::{JoinClause, JoinType};

impl<M> QueryBuilder<M> {
    fn push_join(mut self, join_type: JoinType, table: &str, on: Option<(&str, &str)>) -> Self {
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            on: on.map(|(left, right)| (left.to_string(), right.to_string())),
        });
        self
    }

    /// Add INNER JOIN
    pub fn join(self, table: &str, left: &str, right: &str) -> Self {
        self.push_join(JoinType::Inner, table, Some((left, right)))
    }

    /// Add LEFT JOIN
    pub fn left_join(self, table: &str, left: &str, right: &str) -> Self {
        self.push_join(JoinType::Left, table, Some((left, right)))
    }

    /// Add RIGHT JOIN
    pub fn right_join(self, table: &str, left: &str, right: &str) -> Self {
        self.push_join(JoinType::Right, table, Some((left, right)))
    }

    /// Add CROSS JOIN (no ON condition)
    pub fn cross_join(self, table: &str) -> Self {
        self.push_join(JoinType::Cross, table, None)
    }
}
