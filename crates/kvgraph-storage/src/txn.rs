//! Query-id scoped write correlation shared by all backends.
//!
//! Scopes nest: every synchronous call in a cascade re-opens the scope of the
//! query id it was handed, so a depth counter decides when the logical unit
//! actually closes. Nothing here is atomic; writes land immediately and the
//! tracker only counts them.

use std::collections::HashMap;
use std::sync::Mutex;

use kvgraph_core::QueryId;

use crate::error::StorageError;
use crate::types::BatchSummary;

#[derive(Debug, Default)]
struct OpenBatch {
    depth: usize,
    sets: usize,
    deletes: usize,
}

/// Tracks open transaction scopes by query id.
#[derive(Debug, Default)]
pub struct TxnTracker {
    open: Mutex<HashMap<QueryId, OpenBatch>>,
}

impl TxnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_open<R>(
        &self,
        f: impl FnOnce(&mut HashMap<QueryId, OpenBatch>) -> R,
    ) -> Result<R, StorageError> {
        let mut open = self
            .open
            .lock()
            .map_err(|_| StorageError::LockPoisoned("transaction tracker"))?;
        Ok(f(&mut open))
    }

    /// Opens (or re-enters) the scope for `query`.
    pub fn begin(&self, query: &QueryId) -> Result<(), StorageError> {
        self.with_open(|open| open.entry(query.clone()).or_default().depth += 1)
    }

    pub fn record_set(&self, query: &QueryId) -> Result<(), StorageError> {
        self.with_open(|open| {
            if let Some(batch) = open.get_mut(query) {
                batch.sets += 1;
            }
        })
    }

    pub fn record_delete(&self, query: &QueryId) -> Result<(), StorageError> {
        self.with_open(|open| {
            if let Some(batch) = open.get_mut(query) {
                batch.deletes += 1;
            }
        })
    }

    /// Leaves the scope for `query`.
    ///
    /// Returns the batch summary when the outermost scope closes.
    pub fn end(&self, query: &QueryId) -> Result<Option<BatchSummary>, StorageError> {
        let closed = self.with_open(|open| {
            let batch = open.get_mut(query)?;
            batch.depth -= 1;
            if batch.depth > 0 {
                return Some(None);
            }
            let batch = open.remove(query)?;
            Some(Some(BatchSummary {
                query_id: query.clone(),
                sets: batch.sets,
                deletes: batch.deletes,
            }))
        })?;

        match closed {
            Some(summary) => {
                if let Some(summary) = &summary {
                    tracing::debug!(
                        query_id = %summary.query_id,
                        sets = summary.sets,
                        deletes = summary.deletes,
                        "transaction scope closed"
                    );
                }
                Ok(summary)
            }
            None => Err(StorageError::TransactionNotOpen(query.to_string())),
        }
    }

    /// Number of query ids with an open scope.
    pub fn open_scopes(&self) -> usize {
        self.open.lock().map(|open| open.len()).unwrap_or(0)
    }
}
