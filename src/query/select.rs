//! Query Builder SELECT operations

use super::builder::QueryBuilder;

/// Whether a select column should bypass identifier quoting: anything
/// containing parentheses, spaces, or a bare `*` is treated as a SQL
/// expression (aggregates, aliases) and passes through verbatim.
pub(crate) fn looks_like_expression(column: &str) -> bool {
    column == "*"
        || column.contains('(')
        || column.contains(')')
        || column.contains(' ')
}

impl<M> QueryBuilder<M> {
    /// Set the SELECT column list. Plain column names are identifier
    /// quoted at compile time; expressions pass through verbatim.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append one column to the SELECT list
    pub fn add_select(mut self, column: &str) -> Self {
        self.select_columns.push(column.to_string());
        self
    }

    /// Request DISTINCT rows
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_expressions() {
        assert!(looks_like_expression("COUNT(1)"));
        assert!(looks_like_expression("SUM(price) AS total"));
        assert!(looks_like_expression("*"));
        assert!(!looks_like_expression("price"));
        assert!(!looks_like_expression("users.name"));
    }
}
