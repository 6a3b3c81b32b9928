//! Query Builder ORDER BY and GROUP BY operations

use super::builder::QueryBuilder;
use super::types::OrderDirection;

impl<M> QueryBuilder<M> {
    /// Add ORDER BY with an explicit direction string ("ASC"/"DESC")
    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        self.order_by
            .push((column.to_string(), OrderDirection::parse(direction)));
        self
    }

    /// Add ORDER BY ascending
    pub fn order_by_asc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Add ORDER BY descending
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    /// Add GROUP BY columns. No validation pairs this with HAVING;
    /// nonsensical combinations pass through to the driver.
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by.extend(columns.iter().map(|c| c.to_string()));
        self
    }
}
