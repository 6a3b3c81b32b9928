//! Error types for the ORM system
//!
//! Locally recoverable "nothing to do" conditions collapse to
//! `false`/`None`/empty collections at the call site; everything that
//! reaches this taxonomy propagates to the caller unmodified. No retry
//! policy lives in this layer.

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ORM error type alias
pub type OrmError = ModelError;

/// ORM result type alias
pub type OrmResult<T> = ModelResult<T>;

/// Error types for ORM operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Database connection or statement error, propagated from the driver
    #[error("Database error: {0}")]
    Database(String),

    /// `find_or_fail` with no matching row
    #[error("{entity} not found for {condition}")]
    NotFound {
        entity: &'static str,
        condition: String,
    },

    /// Query building error
    #[error("Query error: {0}")]
    Query(String),

    /// Relationship declaration or loading error
    #[error("Relationship error: {0}")]
    Relationship(String),

    /// Row-to-model conversion error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection or pool error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ModelError {
    /// Build a NotFound error for an entity and a rendered condition description.
    pub fn not_found(entity: &'static str, condition: impl Into<String>) -> Self {
        ModelError::NotFound {
            entity,
            condition: condition.into(),
        }
    }
}

// Convert from sqlx errors
impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        ModelError::Database(err.to_string())
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

// Convert from anyhow errors
impl From<anyhow::Error> for ModelError {
    fn from(err: anyhow::Error) -> Self {
        ModelError::Database(err.to_string())
    }
}

/// Database connection pool error types
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Connection acquisition failed: {0}")]
    AcquisitionFailed(#[from] sqlx::Error),

    #[error("Connection timeout after {timeout}s")]
    ConnectionTimeout { timeout: u64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl From<PoolError> for ModelError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::AcquisitionFailed(sqlx_err) => {
                ModelError::Connection(format!("Database connection failed: {}", sqlx_err))
            }
            PoolError::ConnectionTimeout { timeout } => {
                ModelError::Connection(format!("Database connection timeout after {}s", timeout))
            }
            PoolError::ConfigurationError { message } => {
                ModelError::Configuration(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_entity_and_condition() {
        let err = ModelError::not_found("users", "id = 42");
        assert_eq!(err.to_string(), "users not found for id = 42");
    }

    #[test]
    fn pool_errors_convert_to_connection_errors() {
        let err: ModelError = PoolError::ConnectionTimeout { timeout: 30 }.into();
        assert!(matches!(err, ModelError::Connection(_)));
    }
}
