//! Shared helpers for lifecycle tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use kvgraph_core::body::{as_body, decode};
use kvgraph_core::keys::{InEdgeKey, OutEdgeKey};
use kvgraph_core::{EdgeType, KeyPattern, QueryId, VertexId};
use kvgraph_storage::{BatchSummary, InMemoryStore, KvStore, StorageError};

use crate::runtime::{EdgeOp, Message, Runtime, VertexOp};
use crate::schema::common::Reply;

pub fn harness() -> (Arc<InMemoryStore>, Runtime) {
    let store = Arc::new(InMemoryStore::new());
    let runtime = Runtime::new(store.clone());
    (store, runtime)
}

/// Which writes a [`FaultyStore`] rejects once armed.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// `set` of any key containing the fragment.
    Set(&'static str),
    /// `delete` of any key containing the fragment.
    Delete(&'static str),
}

/// An in-memory store that rejects matching writes after [`FaultyStore::arm`].
pub struct FaultyStore {
    inner: Arc<InMemoryStore>,
    fault: Fault,
    armed: AtomicBool,
}

impl FaultyStore {
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn reject(&self, key: &str, deleting: bool) -> Result<(), StorageError> {
        let fragment = match (self.fault, deleting) {
            (Fault::Set(fragment), false) | (Fault::Delete(fragment), true) => fragment,
            _ => return Ok(()),
        };
        if self.armed.load(Ordering::SeqCst) && key.contains(fragment) {
            return Err(StorageError::LockPoisoned("injected fault"));
        }
        Ok(())
    }
}

impl KvStore for FaultyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8], query: &QueryId) -> Result<(), StorageError> {
        self.reject(key, false)?;
        self.inner.set(key, value, query)
    }

    fn delete(&self, key: &str, query: &QueryId) -> Result<(), StorageError> {
        self.reject(key, true)?;
        self.inner.delete(key, query)
    }

    fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>, StorageError> {
        self.inner.scan(pattern)
    }

    fn begin_txn(&self, query: &QueryId) -> Result<(), StorageError> {
        self.inner.begin_txn(query)
    }

    fn end_txn(&self, query: &QueryId) -> Result<Option<BatchSummary>, StorageError> {
        self.inner.end_txn(query)
    }
}

/// Like [`harness`], but writes go through a disarmed [`FaultyStore`].
pub fn faulty_harness(fault: Fault) -> (Arc<FaultyStore>, Runtime) {
    let store = Arc::new(FaultyStore {
        inner: Arc::new(InMemoryStore::new()),
        fault,
        armed: AtomicBool::new(false),
    });
    let runtime = Runtime::new(store.clone());
    (store, runtime)
}

fn vid(s: &str) -> VertexId {
    VertexId::new(s).unwrap()
}

fn object(value: Value) -> kvgraph_core::Body {
    as_body(Some(value)).expect("test bodies are objects")
}

pub async fn create_vertex(runtime: &Runtime, id: &str, body: Value) -> Reply {
    let message = Message::Vertex(VertexOp::Create { body: object(body) });
    runtime.request(vid(id), QueryId::generate(), message).await
}

pub async fn update_vertex(runtime: &Runtime, id: &str, body: Value) -> Reply {
    let message = Message::Vertex(VertexOp::Update { body: object(body) });
    runtime.request(vid(id), QueryId::generate(), message).await
}

pub async fn delete_vertex(runtime: &Runtime, id: &str) -> Reply {
    let message = Message::Vertex(VertexOp::Delete);
    runtime.request(vid(id), QueryId::generate(), message).await
}

pub async fn create_edge(runtime: &Runtime, source: &str, edge_type: &str, target: &str, body: Value) -> Reply {
    let message = Message::Edge(EdgeOp::Create {
        edge_type: EdgeType::new(edge_type).unwrap(),
        target: vid(target),
        body: object(body),
    });
    runtime.request(vid(source), QueryId::generate(), message).await
}

pub async fn update_edge(runtime: &Runtime, source: &str, edge_type: &str, target: &str, body: Value) -> Reply {
    let message = Message::Edge(EdgeOp::Update {
        edge_type: EdgeType::new(edge_type).unwrap(),
        target: vid(target),
        body: object(body),
    });
    runtime.request(vid(source), QueryId::generate(), message).await
}

pub async fn delete_edge(runtime: &Runtime, source: &str, edge_type: &str, target: &str) -> Reply {
    let message = Message::Edge(EdgeOp::Delete {
        edge_type: EdgeType::new(edge_type).unwrap(),
        target: vid(target),
    });
    runtime.request(vid(source), QueryId::generate(), message).await
}

pub fn scan(store: &InMemoryStore, pattern: &str) -> Vec<String> {
    store.scan(&KeyPattern::parse(pattern).unwrap()).unwrap()
}

pub fn all_keys(store: &InMemoryStore) -> Vec<String> {
    scan(store, ">")
}

pub fn store_has(store: &InMemoryStore, key: &str) -> bool {
    store.contains(key).unwrap()
}

pub fn stored_body(store: &InMemoryStore, key: &str) -> Option<Value> {
    store
        .get(key)
        .unwrap()
        .map(|bytes| Value::Object(decode(&bytes).unwrap()))
}

/// Asserts that out-records and in-records are in one-to-one correspondence.
pub fn assert_mirrored(store: &InMemoryStore) {
    for key in all_keys(store) {
        if let Ok(out) = OutEdgeKey::parse(&key) {
            let mirror = out.mirror().encode();
            assert!(store_has(store, &mirror), "{key} has no in-record {mirror}");
        }
        if let Ok(incoming) = InEdgeKey::parse(&key) {
            let origin = incoming.origin().encode();
            assert!(store_has(store, &origin), "{key} has no out-record {origin}");
        }
    }
}
