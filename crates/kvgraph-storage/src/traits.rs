//! The [`KvStore`] trait defining the store collaborator contract.
//!
//! The graph layer only ever needs six primitives: point lookup, set,
//! delete, ordered pattern enumeration, and a begin/end pair correlating a
//! sequence of writes under one query id. All backends (InMemoryStore,
//! SqliteStore) implement this trait, so they are fully swappable.

use kvgraph_core::{KeyPattern, QueryId};

use crate::error::StorageError;
use crate::types::BatchSummary;

/// The storage contract for the flat graph namespace.
///
/// Methods take `&self`: one store instance is shared by every actor lane,
/// and backends guard their own state. The trait is synchronous; no
/// operation here waits on another actor.
pub trait KvStore: Send + Sync {
    /// Looks up a key. `Ok(None)` signals a miss.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Writes `value` under `key`, correlated with `query`.
    fn set(&self, key: &str, value: &[u8], query: &QueryId) -> Result<(), StorageError>;

    /// Removes `key`, correlated with `query`. Removing a missing key is not
    /// an error.
    fn delete(&self, key: &str, query: &QueryId) -> Result<(), StorageError>;

    /// Enumerates keys matching `pattern` in ascending order.
    fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>, StorageError>;

    /// Opens or re-enters the scope of `query`.
    fn begin_txn(&self, query: &QueryId) -> Result<(), StorageError>;

    /// Leaves the scope of `query`, returning a summary when the outermost
    /// scope closes.
    fn end_txn(&self, query: &QueryId) -> Result<Option<BatchSummary>, StorageError>;

    /// Returns `true` if `key` is present.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
