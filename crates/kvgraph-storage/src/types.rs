//! Storage-layer types for transaction bookkeeping.

use serde::{Deserialize, Serialize};

use kvgraph_core::QueryId;

/// Summary of the writes correlated under one query id.
///
/// Produced when the outermost scope for the query id closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Correlation token of the logical mutation.
    pub query_id: QueryId,
    /// Number of `set` calls issued inside the scope.
    pub sets: usize,
    /// Number of `delete` calls issued inside the scope.
    pub deletes: usize,
}
