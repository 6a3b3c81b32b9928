//! Core Model trait
//!
//! A model is a typed struct that knows its table, its primary key, and
//! how to move between itself and an attribute map. The attribute map
//! is always computed from the struct's fields, so there is no separate
//! dirty-tracking state to keep in sync.

use std::fmt;

use serde_json::{Map, Value};

use crate::backends::Driver;
use crate::error::{ModelError, ModelResult};
use crate::model::AttributeMap;
use crate::relationships::{registry, Relation};

#[allow(async_fn_in_trait)]
pub trait Model: Sized + Send + Sync + 'static {
    /// Primary key type (i64, Uuid, String, ...)
    type PrimaryKey: Clone + Send + Sync + fmt::Debug + fmt::Display;

    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key column name
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// Current primary key value, if the model is persisted
    fn primary_key(&self) -> Option<Self::PrimaryKey>;

    /// Record the primary key after an insert
    fn set_primary_key(&mut self, key: Self::PrimaryKey);

    /// Forget the primary key, returning the model to a transient state
    fn clear_primary_key(&mut self);

    /// Hydrate from a row's attribute map
    fn from_attributes(attributes: &AttributeMap) -> ModelResult<Self>;

    /// Serialize the model's fields into an attribute map, in a stable
    /// column order
    fn to_attributes(&self) -> AttributeMap;

    /// Single attribute value by column name
    fn attribute(&self, name: &str) -> Option<Value> {
        self.to_attributes().get(name).cloned()
    }

    /// Declared relationships, as `(name, relation)` pairs. The result
    /// is cached per model in the relationship registry.
    fn relations() -> Vec<(&'static str, Relation)> {
        Vec::new()
    }

    /// Look up one declared relationship by name
    fn relation(name: &str) -> Option<Relation> {
        registry::relations_for::<Self>().get(name).cloned()
    }

    /// Loaded relationship data for serialization. Unloaded relations
    /// must be absent from the map, not null.
    fn relations_document(&self) -> Map<String, Value> {
        Map::new()
    }

    /// JSON document: attributes plus any loaded relationship data
    fn to_document(&self) -> Value {
        let mut document = match self.to_attributes().to_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (name, value) in self.relations_document() {
            document.insert(name, value);
        }
        Value::Object(document)
    }

    /// Batch-load one named relationship into every model in the slice.
    /// Implementations dispatch on `name` to the typed loaders in
    /// `relationships::loader`.
    #[allow(unused_variables)]
    async fn load_relation(
        models: &mut [Self],
        name: &str,
        driver: &dyn Driver,
    ) -> ModelResult<()> {
        Err(ModelError::Relationship(format!(
            "unknown relation '{}' on {}",
            name,
            Self::table_name()
        )))
    }
}
