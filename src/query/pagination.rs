//! Query Builder pagination operations

use super::builder::QueryBuilder;

impl<M> QueryBuilder<M> {
    /// Set LIMIT
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    /// Set OFFSET
    pub fn offset(mut self, count: i64) -> Self {
        self.offset_value = Some(count);
        self
    }

    /// Alias for `offset`
    pub fn skip(self, count: i64) -> Self {
        self.offset(count)
    }

    /// Select the half-open row range `[from, to)`: offset = from,
    /// limit = to - from, both clamped to zero
    pub fn from_to(self, from: i64, to: i64) -> Self {
        let offset = from.max(0);
        let limit = (to - from).max(0);
        self.offset(offset).limit(limit)
    }

    /// Page-number pagination (pages start at 1)
    pub fn page(self, page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        self.offset((page - 1) * per_page).limit(per_page)
    }
}
