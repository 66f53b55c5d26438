//! Response types for read queries.

use serde::{Deserialize, Serialize};

use kvgraph_core::keys::{InEdgeKey, OutEdgeKey, TagKey};
use kvgraph_core::{Body, EdgeType, Tag, VertexId};

/// A vertex and its body.
#[derive(Debug, Clone, Serialize)]
pub struct VertexView {
    pub id: VertexId,
    pub body: Body,
}

/// One edge and its body.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub source: VertexId,
    pub link_type: EdgeType,
    pub target: VertexId,
    pub body: Body,
}

/// An out-edge as seen from its source.
#[derive(Debug, Clone, Serialize)]
pub struct OutEdgeView {
    pub link_type: EdgeType,
    pub target: VertexId,
}

impl From<OutEdgeKey> for OutEdgeView {
    fn from(key: OutEdgeKey) -> Self {
        OutEdgeView {
            link_type: key.edge_type,
            target: key.target,
        }
    }
}

impl From<TagKey> for OutEdgeView {
    fn from(key: TagKey) -> Self {
        OutEdgeView::from(key.edge())
    }
}

/// An in-edge as seen from its target.
#[derive(Debug, Clone, Serialize)]
pub struct InEdgeView {
    pub source: VertexId,
    pub link_type: EdgeType,
}

impl From<InEdgeKey> for InEdgeView {
    fn from(key: InEdgeKey) -> Self {
        InEdgeView {
            source: key.source,
            link_type: key.edge_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutEdgesResponse {
    pub vertex: VertexId,
    pub edges: Vec<OutEdgeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InEdgesResponse {
    pub vertex: VertexId,
    pub edges: Vec<InEdgeView>,
}

/// Out-edges of a vertex carrying one tag.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedEdgesResponse {
    pub vertex: VertexId,
    pub tag: Tag,
    pub edges: Vec<OutEdgeView>,
}

/// Query string of `GET /keys`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeysQuery {
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub pattern: String,
    pub keys: Vec<String>,
}
