//! Storage error model.

use thiserror::Error;

/// Failure at the storage boundary.
///
/// Callers convert this to a generic server error before it reaches the
/// wire; internal detail never leaks to HTTP clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be decoded back into an entity.
    #[error("corrupt row: {0}")]
    Decode(String),
}
