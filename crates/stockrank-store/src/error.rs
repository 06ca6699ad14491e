//! Error types for price persistence

use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver, pool or query failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A schema statement failed
    #[error("running {table} migration: {source}")]
    Migration {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Connection string could not be parsed
    #[error("invalid database URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
