//! In-memory implementation of [`KvStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and anywhere persistence isn't needed. Keys live in a `BTreeMap` so
//! pattern scans walk an ordered range, exactly like the SQLite backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock};

use kvgraph_core::{KeyPattern, QueryId};

use crate::error::StorageError;
use crate::traits::KvStore;
use crate::txn::TxnTracker;
use crate::types::BatchSummary;

/// In-memory implementation of [`KvStore`].
///
/// Also keeps every closed batch summary so tests can check which writes a
/// logical mutation was correlated with.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    txns: TxnTracker,
    closed: Mutex<Vec<BatchSummary>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Batches closed so far, oldest first.
    pub fn closed_batches(&self) -> Vec<BatchSummary> {
        self.closed.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of query ids whose scope is still open.
    pub fn open_scopes(&self) -> usize {
        self.txns.open_scopes()
    }

    /// Copy of every key/value pair, in key order.
    pub fn snapshot(&self) -> Result<Vec<(String, Vec<u8>)>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("memory entries"))?;
        Ok(entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("memory entries"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8], query: &QueryId) -> Result<(), StorageError> {
        {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StorageError::LockPoisoned("memory entries"))?;
            entries.insert(key.to_string(), value.to_vec());
        }
        self.txns.record_set(query)
    }

    fn delete(&self, key: &str, query: &QueryId) -> Result<(), StorageError> {
        {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StorageError::LockPoisoned("memory entries"))?;
            entries.remove(key);
        }
        self.txns.record_delete(query)
    }

    fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("memory entries"))?;
        let prefix = pattern.literal_prefix();
        Ok(entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| pattern.matches(k))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn begin_txn(&self, query: &QueryId) -> Result<(), StorageError> {
        self.txns.begin(query)
    }

    fn end_txn(&self, query: &QueryId) -> Result<Option<BatchSummary>, StorageError> {
        let summary = self.txns.end(query)?;
        if let Some(summary) = &summary {
            self.closed
                .lock()
                .map_err(|_| StorageError::LockPoisoned("closed batches"))?
                .push(summary.clone());
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> QueryId {
        QueryId(s.to_string())
    }

    fn pattern(s: &str) -> KeyPattern {
        KeyPattern::parse(s).unwrap()
    }

    #[test]
    fn test_get_set_delete() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", b"{}", &q("q")).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"{}".to_vec()));
        assert!(store.contains("a").unwrap());

        store.delete("a", &q("q")).unwrap();
        assert!(!store.contains("a").unwrap());
        // Deleting again is a no-op.
        store.delete("a", &q("q")).unwrap();
    }

    #[test]
    fn test_scan_is_ordered_and_exact() {
        let store = InMemoryStore::new();
        for key in [
            "a",
            "a.out.ltp_oid-bdy.t2.c",
            "a.out.ltp_oid-bdy.t1.b",
            "a.in.oid_ltp-nil.x.t1",
            "ab.out.ltp_oid-bdy.t1.b",
        ] {
            store.set(key, b"", &q("q")).unwrap();
        }

        let keys = store.scan(&pattern("a.out.ltp_oid-bdy.>")).unwrap();
        assert_eq!(keys, vec!["a.out.ltp_oid-bdy.t1.b", "a.out.ltp_oid-bdy.t2.c"]);

        let keys = store.scan(&pattern("*.out.ltp_oid-bdy.t1.b")).unwrap();
        assert_eq!(keys, vec!["a.out.ltp_oid-bdy.t1.b", "ab.out.ltp_oid-bdy.t1.b"]);

        assert_eq!(store.scan(&pattern("a")).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_closed_batches_count_correlated_writes() {
        let store = InMemoryStore::new();
        let query = q("q1");

        store.begin_txn(&query).unwrap();
        store.set("a", b"{}", &query).unwrap();
        store.begin_txn(&query).unwrap();
        store.delete("b", &query).unwrap();
        assert_eq!(store.end_txn(&query).unwrap(), None);
        store.set("c", b"", &q("other")).unwrap();
        let summary = store.end_txn(&query).unwrap().unwrap();

        assert_eq!(summary.sets, 1);
        assert_eq!(summary.deletes, 1);
        assert_eq!(store.closed_batches(), vec![summary]);
        assert_eq!(store.open_scopes(), 0);
    }
}
