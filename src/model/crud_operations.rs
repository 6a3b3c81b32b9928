//! CRUD operations for Model types
//!
//! Blanket-implemented persistence surface: every `Model` gets
//! `find`/`create`/`update`/`delete`/`save` for free. All SQL goes
//! through the shared statement compilers, so bindings and quoting
//! behave exactly like hand-built queries.

use serde_json::Value;
use tracing::debug;

use crate::backends::Driver;
use crate::collection::Collection;
use crate::error::{ModelError, ModelResult};
use crate::model::{Condition, Model};
use crate::query::{compile_delete, compile_insert, compile_update, QueryBuilder};

#[allow(async_fn_in_trait)]
pub trait CrudOperations: Model {
    /// Start a typed query against this model's table
    fn query() -> QueryBuilder<Self> {
        QueryBuilder::new().from(Self::table_name())
    }

    /// First model matching the condition, if any
    async fn find<C>(condition: C, driver: &dyn Driver) -> ModelResult<Option<Self>>
    where
        C: Into<Condition> + Send,
    {
        condition
            .into()
            .apply(Self::query(), Self::primary_key_name())
            .one(driver)
            .await
    }

    /// Every model matching the condition
    async fn find_all<C>(condition: C, driver: &dyn Driver) -> ModelResult<Collection<Self>>
    where
        C: Into<Condition> + Send,
    {
        condition
            .into()
            .apply(Self::query(), Self::primary_key_name())
            .all(driver)
            .await
    }

    /// Like `find`, but a missing row is an error
    async fn find_or_fail<C>(condition: C, driver: &dyn Driver) -> ModelResult<Self>
    where
        C: Into<Condition> + Send,
    {
        let condition = condition.into();
        let description = condition.describe(Self::primary_key_name());
        condition
            .apply(Self::query(), Self::primary_key_name())
            .one(driver)
            .await?
            .ok_or_else(|| ModelError::not_found(Self::table_name(), description))
    }

    /// Insert a new row from the model's attributes. On success the
    /// returned model carries the database-assigned primary key; no
    /// follow-up SELECT is issued. `None` means the insert affected no
    /// rows.
    async fn create(self, driver: &dyn Driver) -> ModelResult<Option<Self>> {
        let mut attributes = self.to_attributes();
        if self.primary_key().is_none() {
            attributes.remove(Self::primary_key_name());
        }
        // No fields to insert: a no-op, not an error
        if attributes.is_empty() {
            return Ok(None);
        }

        let (sql, params) = compile_insert(Self::table_name(), &attributes, &driver.dialect());
        debug!(sql = %sql, "inserting model");
        let (affected, generated_key) = driver.insert(&sql, &params).await?;
        if affected == 0 {
            return Ok(None);
        }

        if self.primary_key().is_none() {
            if let Some(id) = generated_key {
                attributes.set(Self::primary_key_name(), Value::from(id));
                return Self::from_attributes(&attributes).map(Some);
            }
        }
        Ok(Some(self))
    }

    /// Write the model's attributes back to its row. A model without a
    /// primary key is not persisted; no SQL runs and `false` is
    /// returned.
    async fn update(&self, driver: &dyn Driver) -> ModelResult<bool> {
        let Some(pk_value) = self.persisted_key() else {
            return Ok(false);
        };

        let mut attributes = self.to_attributes();
        attributes.remove(Self::primary_key_name());
        if attributes.is_empty() {
            return Ok(false);
        }

        let (sql, params) = compile_update(
            Self::table_name(),
            &attributes,
            Self::primary_key_name(),
            pk_value,
            &driver.dialect(),
        );
        debug!(sql = %sql, "updating model");
        Ok(driver.execute(&sql, &params).await? > 0)
    }

    /// Delete the model's row. On success the primary key is cleared,
    /// so a later `save` re-inserts. Returns `false` without touching
    /// the database when the model has no primary key.
    async fn delete(&mut self, driver: &dyn Driver) -> ModelResult<bool> {
        let Some(pk_value) = self.persisted_key() else {
            return Ok(false);
        };

        let (sql, params) = compile_delete(
            Self::table_name(),
            Self::primary_key_name(),
            pk_value,
            &driver.dialect(),
        );
        debug!(sql = %sql, "deleting model");
        let affected = driver.execute(&sql, &params).await?;
        if affected > 0 {
            self.clear_primary_key();
        }
        Ok(affected > 0)
    }

    /// Insert or update depending on whether the model has a primary
    /// key. After an insert, `self` is replaced with the persisted
    /// model so the assigned key is visible to the caller.
    async fn save(&mut self, driver: &dyn Driver) -> ModelResult<bool>
    where
        Self: Clone,
    {
        if self.primary_key().is_some() {
            return self.update(driver).await;
        }
        match self.clone().create(driver).await? {
            Some(persisted) => {
                *self = persisted;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Primary key as a bindable value, when the model is persisted
    fn persisted_key(&self) -> Option<Value> {
        self.primary_key()?;
        self.attribute(Self::primary_key_name())
            .filter(|value| !value.is_null())
    }
}

impl<M: Model> CrudOperations for M {}
