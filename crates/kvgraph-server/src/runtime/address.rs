//! Actor addresses.
//!
//! Every vertex id owns three lanes, each an independently scheduled entry
//! point. The mirror lane is the "mirror-only" entry point used to register
//! and unregister in-records; it is rendered with the reserved alias suffix
//! (`<id>===mirror`) that vertex ids are forbidden to contain.

use std::fmt;

use serde::Serialize;

use kvgraph_core::id::ALIAS_MARKER;
use kvgraph_core::VertexId;

/// One serialized entry point of a vertex actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Vertex create/update/delete; sole writer of the body key.
    Vertex,
    /// Edge create/update/delete; sole writer of out-records and tag markers.
    Edge,
    /// In-edge register/unregister; sole writer of in-records.
    Mirror,
}

impl Lane {
    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Vertex => "vertex",
            Lane::Edge => "edge",
            Lane::Mirror => "mirror",
        }
    }
}

/// Address of one lane of one vertex actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActorAddress {
    pub lane: Lane,
    pub id: VertexId,
}

impl ActorAddress {
    pub fn vertex(id: VertexId) -> Self {
        ActorAddress {
            lane: Lane::Vertex,
            id,
        }
    }

    pub fn edge(id: VertexId) -> Self {
        ActorAddress {
            lane: Lane::Edge,
            id,
        }
    }

    /// The mirror-only entry point of `id`.
    pub fn mirror(id: VertexId) -> Self {
        ActorAddress {
            lane: Lane::Mirror,
            id,
        }
    }
}

impl fmt::Display for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lane {
            Lane::Mirror => write!(f, "{}{}{}", self.id, ALIAS_MARKER, self.lane.as_str()),
            lane => write!(f, "{}:{}", lane.as_str(), self.id),
        }
    }
}
