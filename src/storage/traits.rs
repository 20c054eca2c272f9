//! Storage traits and error types
//!
//! This module defines the narrow interface the check service writes
//! through, and the errors the storage layer can raise.

use crate::storage::NewCheck;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A field or ordering name outside the table's allow-list. This is a
    /// caller bug, never a runtime input problem.
    #[error("Column '{column}' is not allowed in table '{table}'")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Invalid ordering '{0}': expected '<column> [ASC|DESC]'")]
    InvalidOrder(String),

    #[error("Address not found: {0}")]
    AddressNotFound(i64),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write access for check results
///
/// This is all the check service sees of the storage layer.
pub trait CheckStore: Send + Sync {
    /// Persists one check for `address_id` and returns its id
    fn save_check(&self, address_id: i64, check: &NewCheck) -> StorageResult<i64>;
}
