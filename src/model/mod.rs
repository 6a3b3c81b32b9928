//! Model layer
//!
//! Typed structs backed by attribute maps, with blanket CRUD
//! operations and registry-cached relationship metadata.

pub mod attributes;
pub mod condition;
pub mod core_trait;
pub mod crud_operations;

pub use attributes::AttributeMap;
pub use condition::Condition;
pub use core_trait::Model;
pub use crud_operations::CrudOperations;
