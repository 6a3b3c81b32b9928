//! Strata ORM
//!
//! A small ActiveRecord-style data access layer: a fluent, dialect-aware
//! query builder, typed models with blanket CRUD operations, batch
//! relationship loading, and a driver abstraction over the actual
//! database connection.
//!
//! ```no_run
//! use strata_orm::{CrudOperations, Model};
//! # use strata_orm::{AttributeMap, ModelResult};
//! # #[derive(Clone)]
//! # struct User { id: Option<i64>, email: String }
//! # impl Model for User {
//! #     type PrimaryKey = i64;
//! #     fn table_name() -> &'static str { "users" }
//! #     fn primary_key(&self) -> Option<i64> { self.id }
//! #     fn set_primary_key(&mut self, key: i64) { self.id = Some(key); }
//! #     fn clear_primary_key(&mut self) { self.id = None; }
//! #     fn from_attributes(a: &AttributeMap) -> ModelResult<Self> {
//! #         Ok(User {
//! #             id: a.get("id").and_then(|v| v.as_i64()),
//! #             email: a.get("email").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
//! #         })
//! #     }
//! #     fn to_attributes(&self) -> AttributeMap {
//! #         AttributeMap::from([
//! #             ("id", serde_json::json!(self.id)),
//! #             ("email", serde_json::json!(self.email)),
//! #         ])
//! #     }
//! # }
//! # async fn demo(driver: &dyn strata_orm::Driver) -> ModelResult<()> {
//! let active = User::query()
//!     .where_eq("active", true)
//!     .order_by_desc("created_at")
//!     .limit(10)
//!     .all(driver)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod relationships;

pub use backends::{Driver, PostgresDriver, Row, SqlDialect, StubDriver};
pub use collection::Collection;
pub use config::DatabaseConfig;
pub use error::{ModelError, ModelResult, OrmError, OrmResult, PoolError};
pub use model::{AttributeMap, Condition, CrudOperations, Model};
pub use query::{QueryBuilder, QueryOperator};
pub use relationships::{Relation, Relationship};
