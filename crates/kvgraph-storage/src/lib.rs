//! Store boundary for the kvgraph consistency core.
//!
//! Provides the [`KvStore`] trait defining the contract every backend
//! implements, plus the [`InMemoryStore`] and [`SqliteStore`] as first-class
//! backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: BatchSummary for closed transaction scopes
//! - [`traits`]: KvStore trait definition
//! - [`txn`]: query-id scope tracking shared by the backends
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations for the SQLite backend
//! - [`sqlite`]: SqliteStore implementation
//! - [`hash`]: blake3 digests over key ranges

pub mod error;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod txn;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use hash::digest;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KvStore;
pub use types::BatchSummary;
