//! Attribute Map - Insertion-ordered column/value store
//!
//! The attribute map is the single source of truth for persistence:
//! hydration fills one from a result row, `to_attributes` computes one
//! from a model's typed fields, and INSERT/UPDATE statements serialize
//! it in insertion order so repeated serialization of unchanged state
//! produces identical SQL.

use serde_json::Value;

/// Ordered map from column name to scalar/null attribute value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: Vec<(String, Value)>,
}

impl AttributeMap {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map holds no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an attribute value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Set an attribute, replacing in place when the column already exists
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Remove an attribute, returning its value when present
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(index).1)
    }

    /// Check whether a column is present
    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// (column, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// First value in insertion order, used to read single-column
    /// aggregate results
    pub fn first_value(&self) -> Option<&Value> {
        self.entries.first().map(|(_, value)| value)
    }

    /// Convert to a plain JSON object
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.entries {
            object.insert(name.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl FromIterator<(String, Value)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (column, value) in iter {
            map.set(column, value);
        }
        map
    }
}

impl<const N: usize> From<[(&str, Value); N]> for AttributeMap {
    fn from(pairs: [(&str, Value); N]) -> Self {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preserves_insertion_order() {
        let mut attrs = AttributeMap::new();
        attrs.set("name", json!("a"));
        attrs.set("price", json!(10));
        attrs.set("id", json!(1));

        let columns: Vec<&str> = attrs.columns().collect();
        assert_eq!(columns, vec!["name", "price", "id"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut attrs = AttributeMap::from([("a", json!(1)), ("b", json!(2))]);
        attrs.set("a", json!(3));

        assert_eq!(attrs.get("a"), Some(&json!(3)));
        let columns: Vec<&str> = attrs.columns().collect();
        assert_eq!(columns, vec!["a", "b"]);
    }

    #[test]
    fn remove_returns_value() {
        let mut attrs = AttributeMap::from([("a", json!(1))]);
        assert_eq!(attrs.remove("a"), Some(json!(1)));
        assert_eq!(attrs.remove("a"), None);
        assert!(attrs.is_empty());
    }

    #[test]
    fn converts_to_plain_json_object() {
        let attrs = AttributeMap::from([("id", json!(1)), ("name", json!("a"))]);
        assert_eq!(attrs.to_json(), json!({"id": 1, "name": "a"}));
    }
}
