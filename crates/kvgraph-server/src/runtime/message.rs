//! Validated operation messages routed to actor lanes.
//!
//! Raw requests are decoded and validated at the boundary (see
//! [`crate::schema::ops`]); only well-formed messages reach a lane. The
//! mirror messages are the exception: they carry the raw in-link type so
//! the receiving mirror lane can reject it itself.

use kvgraph_core::{Body, EdgeType, VertexId};

use super::address::{ActorAddress, Lane};

/// Operations served by the vertex lane.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexOp {
    Create { body: Body },
    Update { body: Body },
    Delete,
}

/// Operations served by the edge lane of the source vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeOp {
    Create {
        edge_type: EdgeType,
        target: VertexId,
        body: Body,
    },
    Update {
        edge_type: EdgeType,
        target: VertexId,
        body: Body,
    },
    Delete {
        edge_type: EdgeType,
        target: VertexId,
    },
}

/// Operations served by the mirror lane of the target vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorOp {
    Register { in_link_type: String },
    Unregister { in_link_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Vertex(VertexOp),
    Edge(EdgeOp),
    Mirror(MirrorOp),
}

impl Message {
    /// The lane that serves this message.
    pub fn lane(&self) -> Lane {
        match self {
            Message::Vertex(_) => Lane::Vertex,
            Message::Edge(_) => Lane::Edge,
            Message::Mirror(_) => Lane::Mirror,
        }
    }

    /// The address of `id` that serves this message.
    pub fn address(&self, id: VertexId) -> ActorAddress {
        ActorAddress {
            lane: self.lane(),
            id,
        }
    }

    /// Operation name as used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Vertex(VertexOp::Create { .. }) => "vertex.create",
            Message::Vertex(VertexOp::Update { .. }) => "vertex.update",
            Message::Vertex(VertexOp::Delete) => "vertex.delete",
            Message::Edge(EdgeOp::Create { .. }) => "edge.create",
            Message::Edge(EdgeOp::Update { .. }) => "edge.update",
            Message::Edge(EdgeOp::Delete { .. }) => "edge.delete",
            Message::Mirror(MirrorOp::Register { .. }) => "mirror.register",
            Message::Mirror(MirrorOp::Unregister { .. }) => "mirror.unregister",
        }
    }
}
