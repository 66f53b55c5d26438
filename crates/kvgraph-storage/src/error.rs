//! Storage error types for kvgraph-storage.
//!
//! [`StorageError`] covers the failure modes of the store boundary:
//! serialization, backend errors, schema migration, poisoned locks and
//! misuse of transaction scopes.

use thiserror::Error;

use kvgraph_core::CoreError;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite backend reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// `end_txn` was called for a query id with no open scope.
    #[error("no open transaction scope for query '{0}'")]
    TransactionNotOpen(String),

    /// A key or pattern was rejected by the domain model.
    #[error(transparent)]
    Core(#[from] CoreError),
}
