//! Relationships
//!
//! Declarative relation metadata, a registry caching each model's
//! declarations, and batch/lazy loaders that honor the one-query-per-
//! relation contract.

pub mod loader;
pub mod registry;
pub mod types;

pub use loader::{
    eager_load_belongs_to, eager_load_has_many, eager_load_has_one, load_belongs_to_for,
    load_has_many_for, load_has_one_for,
};
pub use types::{Relation, Relationship};
