//! Relationship loading
//!
//! Batch (eager) and single-parent (lazy) loaders. Eager loading is
//! strictly one query per relation: collect distinct parent keys, fetch
//! every matching related row with one `WHERE .. IN`, then distribute
//! in memory. Parents with no match always receive an explicit empty
//! default, never a skipped assignment.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::types::Relation;
use crate::backends::Driver;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::query::QueryBuilder;

/// Canonical text form used to match key values across rows. String
/// and numeric renderings of the same key compare equal.
fn key_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn key_of<M: Model>(model: &M, column: &str) -> Option<Value> {
    model.attribute(column).filter(|value| !value.is_null())
}

/// Distinct non-null key values across the parents, in first-seen order
fn collect_keys<P: Model>(parents: &[P], column: &str) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    let mut keys = Vec::new();
    for parent in parents {
        if let Some(value) = key_of(parent, column) {
            if seen.insert(key_text(&value)) {
                keys.push(value);
            }
        }
    }
    keys
}

async fn fetch_related<C: Model>(
    relation: &Relation,
    match_column: &str,
    keys: Vec<Value>,
    driver: &dyn Driver,
) -> ModelResult<Vec<C>> {
    debug!(
        table = relation.related_table(),
        column = match_column,
        keys = keys.len(),
        "batch loading relation"
    );
    let query = QueryBuilder::<C>::new()
        .from(relation.related_table())
        .where_in(match_column, keys);
    // Boxed to break the async recursion cycle through
    // `QueryBuilder::all` -> `Model::load_relation` (E0733).
    let collection = Box::pin(async move { query.all(driver).await }).await?;
    Ok(collection.into_vec())
}

/// Eager-load a has-many relation across a batch of parents with one
/// query. `assign` stores each parent's children on the parent.
pub async fn eager_load_has_many<P, C, A>(
    parents: &mut [P],
    relation: &Relation,
    driver: &dyn Driver,
    mut assign: A,
) -> ModelResult<()>
where
    P: Model,
    C: Model + Clone,
    A: FnMut(&mut P, Vec<C>),
{
    if !matches!(relation, Relation::HasMany { .. }) {
        return Err(ModelError::Relationship(
            "has-many loader given a non-has-many relation".to_string(),
        ));
    }
    if parents.is_empty() {
        return Ok(());
    }

    let local_key = relation.local_key_column();
    let foreign_key = relation.foreign_key_column();
    let keys = collect_keys(parents, local_key);

    let mut groups: HashMap<String, Vec<C>> = HashMap::new();
    if !keys.is_empty() {
        for child in fetch_related::<C>(relation, foreign_key, keys, driver).await? {
            if let Some(value) = key_of(&child, foreign_key) {
                groups.entry(key_text(&value)).or_default().push(child);
            }
        }
    }

    for parent in parents.iter_mut() {
        let children = key_of(parent, local_key)
            .and_then(|value| groups.get(&key_text(&value)).cloned())
            .unwrap_or_default();
        assign(parent, children);
    }
    Ok(())
}

/// Eager-load a has-one relation. When several related rows carry the
/// same key, the last row fetched wins.
pub async fn eager_load_has_one<P, C, A>(
    parents: &mut [P],
    relation: &Relation,
    driver: &dyn Driver,
    mut assign: A,
) -> ModelResult<()>
where
    P: Model,
    C: Model + Clone,
    A: FnMut(&mut P, Option<C>),
{
    if !matches!(relation, Relation::HasOne { .. }) {
        return Err(ModelError::Relationship(
            "has-one loader given a non-has-one relation".to_string(),
        ));
    }
    if parents.is_empty() {
        return Ok(());
    }

    let local_key = relation.local_key_column();
    let foreign_key = relation.foreign_key_column();
    let keys = collect_keys(parents, local_key);

    let mut index: HashMap<String, C> = HashMap::new();
    if !keys.is_empty() {
        for child in fetch_related::<C>(relation, foreign_key, keys, driver).await? {
            if let Some(value) = key_of(&child, foreign_key) {
                index.insert(key_text(&value), child);
            }
        }
    }

    for parent in parents.iter_mut() {
        let child = key_of(parent, local_key)
            .and_then(|value| index.get(&key_text(&value)).cloned());
        assign(parent, child);
    }
    Ok(())
}

/// Eager-load a belongs-to relation: parents hold the foreign key, the
/// related table is matched on its own key column. Duplicate related
/// keys resolve last-wins.
pub async fn eager_load_belongs_to<P, C, A>(
    parents: &mut [P],
    relation: &Relation,
    driver: &dyn Driver,
    mut assign: A,
) -> ModelResult<()>
where
    P: Model,
    C: Model + Clone,
    A: FnMut(&mut P, Option<C>),
{
    if !matches!(relation, Relation::BelongsTo { .. }) {
        return Err(ModelError::Relationship(
            "belongs-to loader given a non-belongs-to relation".to_string(),
        ));
    }
    if parents.is_empty() {
        return Ok(());
    }

    let foreign_key = relation.foreign_key_column();
    let owner_key = relation.local_key_column();
    let keys = collect_keys(parents, foreign_key);

    let mut index: HashMap<String, C> = HashMap::new();
    if !keys.is_empty() {
        for owner in fetch_related::<C>(relation, owner_key, keys, driver).await? {
            if let Some(value) = key_of(&owner, owner_key) {
                index.insert(key_text(&value), owner);
            }
        }
    }

    for parent in parents.iter_mut() {
        let owner = key_of(parent, foreign_key)
            .and_then(|value| index.get(&key_text(&value)).cloned());
        assign(parent, owner);
    }
    Ok(())
}

/// Lazy-load a has-many relation for a single parent
pub async fn load_has_many_for<P, C>(
    parent: &P,
    relation: &Relation,
    driver: &dyn Driver,
) -> ModelResult<Vec<C>>
where
    P: Model,
    C: Model,
{
    let Some(key) = key_of(parent, relation.local_key_column()) else {
        return Ok(Vec::new());
    };
    let collection = QueryBuilder::<C>::new()
        .from(relation.related_table())
        .where_eq(relation.foreign_key_column(), key)
        .all(driver)
        .await?;
    Ok(collection.into_vec())
}

/// Lazy-load a has-one relation for a single parent
pub async fn load_has_one_for<P, C>(
    parent: &P,
    relation: &Relation,
    driver: &dyn Driver,
) -> ModelResult<Option<C>>
where
    P: Model,
    C: Model,
{
    let Some(key) = key_of(parent, relation.local_key_column()) else {
        return Ok(None);
    };
    QueryBuilder::<C>::new()
        .from(relation.related_table())
        .where_eq(relation.foreign_key_column(), key)
        .one(driver)
        .await
}

/// Lazy-load a belongs-to relation for a single parent
pub async fn load_belongs_to_for<P, C>(
    parent: &P,
    relation: &Relation,
    driver: &dyn Driver,
) -> ModelResult<Option<C>>
where
    P: Model,
    C: Model,
{
    let Some(key) = key_of(parent, relation.foreign_key_column()) else {
        return Ok(None);
    };
    QueryBuilder::<C>::new()
        .from(relation.related_table())
        .where_eq(relation.local_key_column(), key)
        .one(driver)
        .await
}
