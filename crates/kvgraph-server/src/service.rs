//! GraphService: the single coordinator between HTTP handlers (or the CLI)
//! and the actor runtime.
//!
//! Mutations are decoded and validated here, then routed to the owning
//! lane. Reads go straight to the store. Handlers stay thin wrappers around
//! these methods.

use std::sync::Arc;

use serde_json::Value;

use kvgraph_core::{EdgeType, QueryId, Tag, VertexId};
use kvgraph_storage::KvStore;

use crate::error::ApiError;
use crate::graph::query;
use crate::runtime::Runtime;
use crate::schema::common::Reply;
use crate::schema::ops::{self, Envelope, Operation};
use crate::schema::queries::{
    EdgeView, InEdgesResponse, KeysResponse, OutEdgesResponse, TaggedEdgesResponse, VertexView,
};

/// Entry point for every graph operation and read query.
#[derive(Clone)]
pub struct GraphService {
    runtime: Runtime,
}

impl GraphService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        GraphService {
            runtime: Runtime::new(store),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    fn validate(operation: Operation, id: &str, payload: Value) -> Result<Envelope, Reply> {
        ops::decode(operation, id, payload).map_err(|message| {
            tracing::warn!(operation = %operation, vertex = id, "{message}");
            Reply::failed(message)
        })
    }

    /// Runs `operation` on vertex `id` and waits for its reply.
    ///
    /// Invalid requests get a failed reply without reaching any lane.
    pub async fn invoke(&self, operation: Operation, id: &str, payload: Value) -> Reply {
        match Self::validate(operation, id, payload) {
            Ok(envelope) => {
                self.runtime
                    .request(envelope.id, envelope.query_id, envelope.message)
                    .await
            }
            Err(reply) => reply,
        }
    }

    /// Queues `operation` on vertex `id` without waiting.
    ///
    /// Returns the query id under which the reply will be published on the
    /// egress channel.
    pub fn signal(&self, operation: Operation, id: &str, payload: Value) -> Result<QueryId, ApiError> {
        let envelope = Self::validate(operation, id, payload)
            .map_err(|reply| ApiError::BadRequest(reply.message()))?;
        let query_id = envelope.query_id.clone();
        self.runtime
            .signal(envelope.id, envelope.query_id, envelope.message);
        Ok(query_id)
    }

    pub fn vertex(&self, id: &str) -> Result<VertexView, ApiError> {
        let id = VertexId::new(id)?;
        let body = query::vertex_body(self.runtime.store(), &id)?
            .ok_or_else(|| ApiError::NotFound(format!("vertex '{id}'")))?;
        Ok(VertexView { id, body })
    }

    pub fn edge(&self, source: &str, link_type: &str, target: &str) -> Result<EdgeView, ApiError> {
        let source = VertexId::new(source)?;
        let link_type = EdgeType::new(link_type)?;
        let target = VertexId::new(target)?;
        let body = query::edge_body(self.runtime.store(), &source, &link_type, &target)?
            .ok_or_else(|| ApiError::NotFound(format!("edge '{source}' -{link_type}-> '{target}'")))?;
        Ok(EdgeView {
            source,
            link_type,
            target,
            body,
        })
    }

    pub fn out_edges(&self, id: &str) -> Result<OutEdgesResponse, ApiError> {
        let vertex = VertexId::new(id)?;
        let edges = query::out_edges(self.runtime.store(), &vertex)?;
        Ok(OutEdgesResponse {
            vertex,
            edges: edges.into_iter().map(Into::into).collect(),
        })
    }

    pub fn in_edges(&self, id: &str) -> Result<InEdgesResponse, ApiError> {
        let vertex = VertexId::new(id)?;
        let edges = query::in_edges(self.runtime.store(), &vertex)?;
        Ok(InEdgesResponse {
            vertex,
            edges: edges.into_iter().map(Into::into).collect(),
        })
    }

    pub fn tagged_edges(&self, id: &str, tag: &str) -> Result<TaggedEdgesResponse, ApiError> {
        let vertex = VertexId::new(id)?;
        let tag = Tag::new(tag)?;
        let edges = query::tagged_edges(self.runtime.store(), &vertex, &tag)?;
        Ok(TaggedEdgesResponse {
            vertex,
            tag,
            edges: edges.into_iter().map(Into::into).collect(),
        })
    }

    pub fn keys(&self, pattern: &str) -> Result<KeysResponse, ApiError> {
        let keys = query::scan_keys(self.runtime.store(), pattern)?;
        Ok(KeysResponse {
            pattern: pattern.to_string(),
            keys,
        })
    }
}
