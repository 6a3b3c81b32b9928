//! Query Builder execution for Model types

use serde_json::Value;
use tracing::debug;

use super::builder::QueryBuilder;
use crate::backends::{Driver, Row};
use crate::collection::Collection;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;

impl<M> QueryBuilder<M> {
    /// Execute against a driver and return raw attribute rows
    pub async fn rows(&self, driver: &dyn Driver) -> ModelResult<Vec<Row>> {
        let (sql, params) = self.compile(&driver.dialect())?;
        debug!(sql = %sql, bindings = params.len(), "executing query");
        driver.fetch_all(&sql, &params).await
    }

    /// Execute and return each row as a JSON object, keyed by column
    pub async fn documents(&self, driver: &dyn Driver) -> ModelResult<Vec<Value>> {
        let rows = self.rows(driver).await?;
        Ok(rows.iter().map(|row| row.to_json()).collect())
    }

    async fn aggregate(&self, expression: &str, driver: &dyn Driver) -> ModelResult<Option<Value>> {
        let (sql, params) = self.compile_aggregate(expression, &driver.dialect())?;
        debug!(sql = %sql, "executing aggregate");
        let rows = driver.fetch_all(&sql, &params).await?;
        Ok(rows
            .first()
            .and_then(|row| row.first_value())
            .cloned()
            .filter(|value| !value.is_null()))
    }

    /// COUNT of matching rows
    pub async fn count(&self, driver: &dyn Driver) -> ModelResult<i64> {
        let value = self.aggregate("COUNT(1)", driver).await?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    /// Whether at least one row matches
    pub async fn exists(&self, driver: &dyn Driver) -> ModelResult<bool> {
        Ok(self.count(driver).await? > 0)
    }

    /// SUM over a column; `None` when no rows match
    pub async fn sum(&self, column: &str, driver: &dyn Driver) -> ModelResult<Option<Value>> {
        self.aggregate(
            &format!("SUM({})", driver.dialect().quote_identifier(column)),
            driver,
        )
        .await
    }

    /// AVG over a column; `None` when no rows match
    pub async fn avg(&self, column: &str, driver: &dyn Driver) -> ModelResult<Option<Value>> {
        self.aggregate(
            &format!("AVG({})", driver.dialect().quote_identifier(column)),
            driver,
        )
        .await
    }

    /// MAX over a column; `None` when no rows match
    pub async fn max(&self, column: &str, driver: &dyn Driver) -> ModelResult<Option<Value>> {
        self.aggregate(
            &format!("MAX({})", driver.dialect().quote_identifier(column)),
            driver,
        )
        .await
    }

    /// MIN over a column; `None` when no rows match
    pub async fn min(&self, column: &str, driver: &dyn Driver) -> ModelResult<Option<Value>> {
        self.aggregate(
            &format!("MIN({})", driver.dialect().quote_identifier(column)),
            driver,
        )
        .await
    }
}

impl<M: Model> QueryBuilder<M> {
    /// Execute, hydrate models, and run any queued eager loads
    pub async fn all(&self, driver: &dyn Driver) -> ModelResult<Collection<M>> {
        let rows = self.rows(driver).await?;
        let mut models = Vec::with_capacity(rows.len());
        for row in &rows {
            models.push(M::from_attributes(row)?);
        }

        for relation in self.eager_relations() {
            debug!(model = M::table_name(), relation = %relation, "eager loading");
            M::load_relation(&mut models, relation, driver).await?;
        }

        Ok(Collection::from_vec(models))
    }

    /// Execute with LIMIT 1 and return the first model, if any.
    /// Queued eager loads still run against the single result.
    pub async fn one(&self, driver: &dyn Driver) -> ModelResult<Option<M>> {
        let limited = self.clone().limit(1);
        let mut collection = limited.all(driver).await?;
        Ok(collection.pop_first())
    }

    /// Like `one` but missing rows are an error
    pub async fn one_or_fail(&self, driver: &dyn Driver) -> ModelResult<M> {
        let (sql, _) = self.compile(&driver.dialect())?;
        self.one(driver)
            .await?
            .ok_or_else(|| ModelError::not_found(M::table_name(), format!("query: {}", sql)))
    }

    /// Process matching rows in fixed-size batches. The callback runs
    /// once per non-empty batch; returning `false` stops iteration
    /// early, and the first short batch ends it naturally.
    pub async fn chunk<F>(&self, size: i64, driver: &dyn Driver, mut callback: F) -> ModelResult<()>
    where
        F: FnMut(Collection<M>) -> ModelResult<bool>,
    {
        if size <= 0 {
            return Err(ModelError::Query(
                "chunk size must be positive".to_string(),
            ));
        }
        let mut offset = 0;
        loop {
            let batch = self
                .clone()
                .limit(size)
                .offset(offset)
                .all(driver)
                .await?;
            let fetched = batch.len() as i64;
            if fetched == 0 {
                break;
            }
            if !callback(batch)? || fetched < size {
                break;
            }
            offset += size;
        }
        Ok(())
    }

    /// Batched iteration keyed on the primary key instead of OFFSET, so
    /// rows inserted or deleted mid-iteration cannot shift the window
    pub async fn chunk_by_id<F>(
        &self,
        size: i64,
        driver: &dyn Driver,
        callback: F,
    ) -> ModelResult<()>
    where
        F: FnMut(Collection<M>) -> ModelResult<bool>,
    {
        self.chunk_by_column(size, M::primary_key_name(), driver, callback)
            .await
    }

    /// Watermark-paged iteration over any monotonically increasing
    /// column
    pub async fn chunk_by_column<F>(
        &self,
        size: i64,
        key: &str,
        driver: &dyn Driver,
        mut callback: F,
    ) -> ModelResult<()>
    where
        F: FnMut(Collection<M>) -> ModelResult<bool>,
    {
        if size <= 0 {
            return Err(ModelError::Query(
                "chunk size must be positive".to_string(),
            ));
        }
        let mut last_id: Option<Value> = None;
        loop {
            let mut query = self.clone().order_by_asc(key).limit(size);
            if let Some(id) = &last_id {
                query = query.where_condition(key, ">", id.clone());
            }
            let batch = query.all(driver).await?;
            let fetched = batch.len() as i64;
            if fetched == 0 {
                break;
            }
            last_id = batch.iter().last().and_then(|model| model.attribute(key));
            let short = fetched < size;
            let advanced = last_id.is_some();
            if !callback(batch)? || short || !advanced {
                break;
            }
        }
        Ok(())
    }
}
