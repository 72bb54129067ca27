//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every variant is a transient or environmental failure from the kernel's
/// point of view: an existence check that errors is "unavailable", never
/// "not found".
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored bytes failed re-verification.
    #[error("corrupt record: {0}")]
    Corrupt(#[from] tmail_core::CoreError),

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The blocking worker running a database call failed.
    #[error("background task failed: {0}")]
    Task(String),

    /// The backend is not reachable (used by remote backends and test doubles).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        StoreError::Task(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
