//! Relationship definitions
//!
//! A `Relation` is declarative metadata: which table the related rows
//! live in and which key columns tie the two tables together. The
//! loaders in this module's siblings interpret it; the definition
//! itself never touches the database.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// One related row whose `foreign_key` column references this
    /// model's `local_key`
    HasOne {
        related_table: String,
        foreign_key: String,
        local_key: String,
    },
    /// Many related rows whose `foreign_key` column references this
    /// model's `local_key`
    HasMany {
        related_table: String,
        foreign_key: String,
        local_key: String,
    },
    /// This model's `foreign_key` column references the related row's
    /// `local_key`
    BelongsTo {
        related_table: String,
        foreign_key: String,
        local_key: String,
    },
}

impl Relation {
    pub fn has_one(related_table: &str, foreign_key: &str) -> Self {
        Relation::HasOne {
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            local_key: "id".to_string(),
        }
    }

    pub fn has_many(related_table: &str, foreign_key: &str) -> Self {
        Relation::HasMany {
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            local_key: "id".to_string(),
        }
    }

    pub fn belongs_to(related_table: &str, foreign_key: &str) -> Self {
        Relation::BelongsTo {
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            local_key: "id".to_string(),
        }
    }

    /// Override the default `"id"` local key
    pub fn local_key(mut self, key: &str) -> Self {
        match &mut self {
            Relation::HasOne { local_key, .. }
            | Relation::HasMany { local_key, .. }
            | Relation::BelongsTo { local_key, .. } => *local_key = key.to_string(),
        }
        self
    }

    pub fn related_table(&self) -> &str {
        match self {
            Relation::HasOne { related_table, .. }
            | Relation::HasMany { related_table, .. }
            | Relation::BelongsTo { related_table, .. } => related_table,
        }
    }

    pub fn foreign_key_column(&self) -> &str {
        match self {
            Relation::HasOne { foreign_key, .. }
            | Relation::HasMany { foreign_key, .. }
            | Relation::BelongsTo { foreign_key, .. } => foreign_key,
        }
    }

    pub fn local_key_column(&self) -> &str {
        match self {
            Relation::HasOne { local_key, .. }
            | Relation::HasMany { local_key, .. }
            | Relation::BelongsTo { local_key, .. } => local_key,
        }
    }
}

/// Loaded-state container for relationship data on a model struct.
/// Distinguishes "never loaded" from "loaded and empty" so serializers
/// can omit unloaded relations instead of emitting null.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship<T> {
    value: Option<T>,
    loaded: bool,
}

impl<T> Relationship<T> {
    pub fn unloaded() -> Self {
        Relationship {
            value: None,
            loaded: false,
        }
    }

    pub fn loaded(value: T) -> Self {
        Relationship {
            value: Some(value),
            loaded: true,
        }
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.loaded = true;
    }

    /// Mark the relation loaded, with or without a value. A loaded-but-
    /// absent has-one stays distinguishable from a never-loaded one.
    pub fn set_loaded(&mut self, value: Option<T>) {
        self.value = value;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn take(&mut self) -> Option<T> {
        self.loaded = false;
        self.value.take()
    }
}

impl<T> Default for Relationship<T> {
    fn default() -> Self {
        Self::unloaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_default_the_local_key() {
        let relation = Relation::has_many("posts", "user_id");
        assert_eq!(relation.related_table(), "posts");
        assert_eq!(relation.foreign_key_column(), "user_id");
        assert_eq!(relation.local_key_column(), "id");
    }

    #[test]
    fn local_key_override() {
        let relation = Relation::belongs_to("users", "author_email").local_key("email");
        assert_eq!(relation.local_key_column(), "email");
    }

    #[test]
    fn relationship_tracks_loaded_state() {
        let mut rel: Relationship<Vec<i64>> = Relationship::unloaded();
        assert!(!rel.is_loaded());
        rel.set(vec![]);
        assert!(rel.is_loaded());
        assert_eq!(rel.get(), Some(&vec![]));
    }
}
