//! Storage error model.

use thiserror::Error;

/// Error raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connecting to or bootstrapping the database failed.
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    /// A query against an established pool failed.
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}
