//! Application state shared by all axum handlers.
//!
//! [`AppState`] holds the [`GraphService`], which is cheap to clone: the
//! store and the actor runtime live behind `Arc`s. No handler-level lock is
//! needed since mutations are serialized per vertex by the runtime's lanes.

use std::sync::Arc;

use kvgraph_storage::{InMemoryStore, KvStore, SqliteStore};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::GraphService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: GraphService,
}

impl AppState {
    /// Creates the state described by `config` and starts the idle lane sweep.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn KvStore> = match &config.db_path {
            Some(path) => {
                tracing::info!("opening SQLite store at {}", path);
                Arc::new(SqliteStore::new(path)?)
            }
            None => {
                tracing::info!("using in-memory store");
                Arc::new(InMemoryStore::new())
            }
        };
        let state = AppState::with_store(store);
        state
            .service
            .runtime()
            .lanes()
            .start_idle_sweep(config.sweep_interval);
        Ok(state)
    }

    /// Creates a new `AppState` with an in-memory store (for testing).
    pub fn in_memory() -> Self {
        AppState::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn KvStore>) -> Self {
        AppState {
            service: GraphService::new(store),
        }
    }
}
