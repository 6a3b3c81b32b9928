//! Relationship metadata registry
//!
//! Caches each model's declared relationships in one explicit global
//! map, keyed by table name. `Model::relations()` is only invoked on
//! the first lookup for a model; later lookups share the cached map.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use super::types::Relation;
use crate::model::Model;

type RelationMap = Arc<HashMap<String, Relation>>;

static REGISTRY: Lazy<DashMap<&'static str, RelationMap>> = Lazy::new(DashMap::new);

/// Cached relationship map for a model, built on first access
pub fn relations_for<M: Model>() -> RelationMap {
    REGISTRY
        .entry(M::table_name())
        .or_insert_with(|| {
            Arc::new(
                M::relations()
                    .into_iter()
                    .map(|(name, relation)| (name.to_string(), relation))
                    .collect(),
            )
        })
        .clone()
}

/// Drop one model's cached relationships
pub fn invalidate(table: &'static str) {
    REGISTRY.remove(table);
}

/// Drop every cached relationship map
pub fn clear() {
    REGISTRY.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelResult;
    use crate::model::AttributeMap;

    macro_rules! test_model {
        ($name:ident, $table:literal) => {
            struct $name {
                id: Option<i64>,
            }

            impl Model for $name {
                type PrimaryKey = i64;

                fn table_name() -> &'static str {
                    $table
                }

                fn primary_key(&self) -> Option<i64> {
                    self.id
                }

                fn set_primary_key(&mut self, key: i64) {
                    self.id = Some(key);
                }

                fn clear_primary_key(&mut self) {
                    self.id = None;
                }

                fn from_attributes(attributes: &AttributeMap) -> ModelResult<Self> {
                    Ok($name {
                        id: attributes.get("id").and_then(|v| v.as_i64()),
                    })
                }

                fn to_attributes(&self) -> AttributeMap {
                    AttributeMap::from([("id", serde_json::json!(self.id))])
                }

                fn relations() -> Vec<(&'static str, Relation)> {
                    vec![("gears", Relation::has_many("gears", "widget_id"))]
                }
            }
        };
    }

    // Each test gets its own table name so parallel tests never share a
    // registry entry
    test_model!(CachedWidget, "registry_cached_widgets");
    test_model!(InvalidatedWidget, "registry_invalidated_widgets");

    #[test]
    fn lookups_hit_the_cached_map() {
        let first = relations_for::<CachedWidget>();
        let second = relations_for::<CachedWidget>();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains_key("gears"));
    }

    #[test]
    fn invalidate_rebuilds_on_next_access() {
        let before = relations_for::<InvalidatedWidget>();
        invalidate(InvalidatedWidget::table_name());
        let after = relations_for::<InvalidatedWidget>();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.len(), after.len());
    }
}
