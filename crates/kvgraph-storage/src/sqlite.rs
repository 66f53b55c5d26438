//! SQLite implementation of [`KvStore`].
//!
//! [`SqliteStore`] persists the flat graph namespace in a single `kv` table
//! with WAL mode and automatic schema migrations. Each write autocommits;
//! transaction scopes only correlate writes, they never roll them back.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use kvgraph_core::{KeyPattern, QueryId};

use crate::error::StorageError;
use crate::traits::KvStore;
use crate::txn::TxnTracker;
use crate::types::BatchSummary;

/// Walks the primary key upward from a literal prefix; callers stop at the
/// first key outside it.
const SCAN_FROM: &str = "SELECT key FROM kv WHERE key >= ?1 ORDER BY key";

/// SQLite-backed implementation of [`KvStore`].
///
/// The connection sits behind a mutex so the store can be shared across
/// actor lanes; every statement is short and never waits on another actor.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    txns: TxnTracker,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            txns: TxnTracker::new(),
        })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            txns: TxnTracker::new(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::LockPoisoned("sqlite connection"))
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8], query: &QueryId) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        self.txns.record_set(query)
    }

    fn delete(&self, key: &str, query: &QueryId) -> Result<(), StorageError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        self.txns.record_delete(query)
    }

    fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>, StorageError> {
        let prefix = pattern.literal_prefix();
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SCAN_FROM)?;
        let mut rows = stmt.query(params![prefix])?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            if !key.starts_with(&prefix) {
                break;
            }
            if pattern.matches(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn begin_txn(&self, query: &QueryId) -> Result<(), StorageError> {
        self.txns.begin(query)
    }

    fn end_txn(&self, query: &QueryId) -> Result<Option<BatchSummary>, StorageError> {
        self.txns.end(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> QueryId {
        QueryId("q".to_string())
    }

    #[test]
    fn test_crud_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", br#"{"x":1}"#, &q()).unwrap();
        store.set("a", br#"{"x":2}"#, &q()).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(br#"{"x":2}"#.to_vec()));

        store.delete("a", &q()).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_empty_marker_values() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("b.in.oid_ltp-nil.a.knows", b"", &q()).unwrap();
        assert_eq!(store.get("b.in.oid_ltp-nil.a.knows").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_scan_matches_pattern() {
        let store = SqliteStore::in_memory().unwrap();
        for key in [
            "a",
            "a.out.ltp_oid-bdy.knows.c",
            "a.out.ltp_oid-bdy.knows.b",
            "a.out.tag_ltp_oid-nil.t1.knows.b",
            "ab.out.ltp_oid-bdy.knows.b",
        ] {
            store.set(key, b"", &q()).unwrap();
        }

        let pattern = KeyPattern::parse("a.out.ltp_oid-bdy.>").unwrap();
        assert_eq!(
            store.scan(&pattern).unwrap(),
            vec!["a.out.ltp_oid-bdy.knows.b", "a.out.ltp_oid-bdy.knows.c"]
        );
    }

    #[test]
    fn test_scan_stops_at_prefix_end() {
        let store = SqliteStore::in_memory().unwrap();
        for key in ["a", "a.in.oid_ltp-nil.c.t", "b", "b.in.oid_ltp-nil.a.t", "c"] {
            store.set(key, b"", &q()).unwrap();
        }

        let pattern = KeyPattern::parse("b.in.oid_ltp-nil.>").unwrap();
        assert_eq!(store.scan(&pattern).unwrap(), vec!["b.in.oid_ltp-nil.a.t"]);

        let everything = KeyPattern::parse(">").unwrap();
        assert_eq!(store.scan(&everything).unwrap().len(), 5);
    }

    #[test]
    fn test_scan_uses_primary_key() {
        let store = SqliteStore::in_memory().unwrap();
        let conn = store.conn().unwrap();
        let mut stmt = conn
            .prepare(&format!("EXPLAIN QUERY PLAN {SCAN_FROM}"))
            .unwrap();
        let plan: Vec<String> = stmt
            .query_map(params!["a.out."], |row| row.get::<_, String>(3))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(
            plan.iter().any(|step| step.contains("USING PRIMARY KEY")),
            "plan: {plan:?}"
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::new(path).unwrap();
            store.set("a", b"{}", &q()).unwrap();
        }

        let store = SqliteStore::new(path).unwrap();
        assert!(store.contains("a").unwrap());
    }
}
