//! Transaction scope guard.

use kvgraph_core::QueryId;
use kvgraph_storage::{BatchSummary, KvStore, StorageError};

/// Brackets the writes of one operation under its query id.
///
/// Nested scopes with the same query id re-enter the store's batch; the
/// batch closes when the outermost scope ends. A scope dropped without
/// [`TxnScope::end`] (an early `?` return) still ends, so failures never
/// leave a batch open. Scopes group writes for the store; they are not
/// atomic.
pub struct TxnScope<'a> {
    store: &'a dyn KvStore,
    query_id: &'a QueryId,
    open: bool,
}

impl<'a> TxnScope<'a> {
    pub fn begin(store: &'a dyn KvStore, query_id: &'a QueryId) -> Result<Self, StorageError> {
        store.begin_txn(query_id)?;
        Ok(TxnScope {
            store,
            query_id,
            open: true,
        })
    }

    /// Ends the scope, returning the batch summary if it was the outermost.
    pub fn end(mut self) -> Result<Option<BatchSummary>, StorageError> {
        self.open = false;
        self.store.end_txn(self.query_id)
    }
}

impl Drop for TxnScope<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.store.end_txn(self.query_id) {
                tracing::warn!(query_id = %self.query_id, error = %err, "failed to end transaction scope");
            }
        }
    }
}
