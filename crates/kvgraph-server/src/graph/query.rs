//! Read queries served straight from the store.
//!
//! Reads do not take any lane. A read racing a mutation may observe a
//! partially applied operation, exactly as any other store reader would.

use kvgraph_core::body::{self, Body};
use kvgraph_core::keys::{self, InEdgeKey, OutEdgeKey, TagKey};
use kvgraph_core::{EdgeType, KeyPattern, Tag, VertexId};
use kvgraph_storage::KvStore;

use crate::error::GraphError;

/// The stored body of `id`, or `None` if the vertex does not exist.
pub fn vertex_body(store: &dyn KvStore, id: &VertexId) -> Result<Option<Body>, GraphError> {
    read_body(store, &keys::body_key(id))
}

/// The body of the edge `source -edge_type-> target`, if present.
pub fn edge_body(
    store: &dyn KvStore,
    source: &VertexId,
    edge_type: &EdgeType,
    target: &VertexId,
) -> Result<Option<Body>, GraphError> {
    let key = OutEdgeKey::new(source.clone(), edge_type.clone(), target.clone());
    read_body(store, &key.encode())
}

/// Out-edges of `id` in key order.
pub fn out_edges(store: &dyn KvStore, id: &VertexId) -> Result<Vec<OutEdgeKey>, GraphError> {
    scan_parsed(store, &keys::out_edges_pattern(id), OutEdgeKey::parse)
}

/// In-edges of `id` in key order.
pub fn in_edges(store: &dyn KvStore, id: &VertexId) -> Result<Vec<InEdgeKey>, GraphError> {
    scan_parsed(store, &keys::in_edges_pattern(id), InEdgeKey::parse)
}

/// Out-edges of `id` carrying `tag`, from the tag index.
pub fn tagged_edges(store: &dyn KvStore, id: &VertexId, tag: &Tag) -> Result<Vec<TagKey>, GraphError> {
    scan_parsed(store, &keys::tagged_edges_pattern(id, tag), TagKey::parse)
}

/// Raw key scan, for debugging.
pub fn scan_keys(store: &dyn KvStore, pattern: &str) -> Result<Vec<String>, GraphError> {
    let pattern = KeyPattern::parse(pattern)?;
    Ok(store.scan(&pattern)?)
}

fn read_body(store: &dyn KvStore, key: &str) -> Result<Option<Body>, GraphError> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(body::decode(&bytes)?)),
        None => Ok(None),
    }
}

fn scan_parsed<T>(
    store: &dyn KvStore,
    pattern: &str,
    parse: fn(&str) -> Result<T, kvgraph_core::CoreError>,
) -> Result<Vec<T>, GraphError> {
    let pattern = KeyPattern::parse(pattern)?;
    store
        .scan(&pattern)?
        .iter()
        .map(|key| parse(key).map_err(GraphError::from))
        .collect()
}
