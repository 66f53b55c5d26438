//! Operation request records and their validation.
//!
//! Requests arrive as JSON objects with optional fields. [`decode`] checks
//! every field, accumulating one `field:kind ...;` note per problem, and
//! either yields a routable [`Envelope`] or the accumulated message. No
//! rejected request reaches a lane, so validation failures never write.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use kvgraph_core::body::{as_body, Body};
use kvgraph_core::{tags, EdgeType, QueryId, VertexId};

use crate::runtime::{EdgeOp, Message, VertexOp};

/// Operations accepted from outside the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    VertexCreate,
    VertexUpdate,
    VertexDelete,
    EdgeCreate,
    EdgeUpdate,
    EdgeDelete,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::VertexCreate,
        Operation::VertexUpdate,
        Operation::VertexDelete,
        Operation::EdgeCreate,
        Operation::EdgeUpdate,
        Operation::EdgeDelete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::VertexCreate => "vertex.create",
            Operation::VertexUpdate => "vertex.update",
            Operation::VertexDelete => "vertex.delete",
            Operation::EdgeCreate => "edge.create",
            Operation::EdgeUpdate => "edge.update",
            Operation::EdgeDelete => "edge.delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operation '{s}'"))
    }
}

/// Request for `vertex.create`, `vertex.update` and `vertex.delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VertexRequest {
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Request for `edge.create`, `edge.update` and `edge.delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeRequest {
    #[serde(default)]
    pub query_id: Option<String>,
    /// Edge type.
    #[serde(default)]
    pub link_type: Option<String>,
    /// Target vertex id.
    #[serde(default)]
    pub descendant_uuid: Option<String>,
    #[serde(default)]
    pub link_body: Option<Value>,
}

/// A validated request, ready to route.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub id: VertexId,
    pub query_id: QueryId,
    pub message: Message,
}

/// Accumulates validation notes for one request.
struct Problems {
    notes: String,
}

impl Problems {
    fn new() -> Self {
        Problems {
            notes: String::new(),
        }
    }

    fn note(&mut self, field: &str, kind: &str, what: impl fmt::Display) {
        if !self.notes.is_empty() {
            self.notes.push(' ');
        }
        self.notes.push_str(&format!("{field}:{kind} {what};"));
    }

    fn missing(&mut self, field: &str, kind: &str) {
        self.note(field, kind, "is missing");
    }

    fn finish<T>(self, operation: Operation, id: &str, value: Option<T>) -> Result<T, String> {
        match value {
            Some(value) if self.notes.is_empty() => Ok(value),
            _ => Err(format!("ERROR {operation} {id}: {}", self.notes)),
        }
    }
}

/// Validates `payload` as a request for `operation` on vertex `id`.
///
/// A missing or empty query id is replaced by a fresh one. An empty payload
/// (`null`) is treated as `{}`.
pub fn decode(operation: Operation, id: &str, payload: Value) -> Result<Envelope, String> {
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let mut problems = Problems::new();

    let vertex = match VertexId::new(id) {
        Ok(vertex) => Some(vertex),
        Err(err) => {
            problems.note("id", "string", err);
            None
        }
    };

    let decoded = match operation {
        Operation::VertexCreate | Operation::VertexUpdate | Operation::VertexDelete => {
            match serde_json::from_value::<VertexRequest>(payload) {
                Ok(request) => decode_vertex(operation, request, &mut problems),
                Err(err) => {
                    problems.note("request", "object", err);
                    None
                }
            }
        }
        Operation::EdgeCreate | Operation::EdgeUpdate | Operation::EdgeDelete => {
            match serde_json::from_value::<EdgeRequest>(payload) {
                Ok(request) => decode_edge(operation, request, &mut problems),
                Err(err) => {
                    problems.note("request", "object", err);
                    None
                }
            }
        }
    };

    let envelope = match (vertex, decoded) {
        (Some(id), Some((query_id, message))) => Some(Envelope {
            id,
            query_id,
            message,
        }),
        _ => None,
    };
    problems.finish(operation, id, envelope)
}

fn query_id(raw: Option<String>) -> QueryId {
    match raw {
        Some(raw) if !raw.is_empty() => QueryId(raw),
        _ => QueryId::generate(),
    }
}

fn decode_vertex(
    operation: Operation,
    request: VertexRequest,
    problems: &mut Problems,
) -> Option<(QueryId, Message)> {
    let query_id = query_id(request.query_id);
    let op = match operation {
        // A non-object body creates an empty vertex.
        Operation::VertexCreate => VertexOp::Create {
            body: as_body(request.body).unwrap_or_default(),
        },
        Operation::VertexUpdate => match as_body(request.body) {
            Some(body) => VertexOp::Update { body },
            None => {
                problems.missing("body", "json");
                return None;
            }
        },
        _ => VertexOp::Delete,
    };
    Some((query_id, Message::Vertex(op)))
}

fn decode_edge(
    operation: Operation,
    request: EdgeRequest,
    problems: &mut Problems,
) -> Option<(QueryId, Message)> {
    let query_id = query_id(request.query_id);
    // Only create may synthesize the edge type and target.
    let synthesize = operation == Operation::EdgeCreate;

    let edge_type = match request.link_type {
        Some(raw) => EdgeType::new(raw)
            .map_err(|err| problems.note("link_type", "string", err))
            .ok(),
        None if synthesize => Some(EdgeType::generate()),
        None => {
            problems.missing("link_type", "string");
            None
        }
    };
    let target = match request.descendant_uuid {
        Some(raw) => VertexId::new(raw)
            .map_err(|err| problems.note("descendant_uuid", "string", err))
            .ok(),
        None if synthesize => Some(VertexId::generate()),
        None => {
            problems.missing("descendant_uuid", "string");
            None
        }
    };

    let body = if operation == Operation::EdgeDelete {
        Some(Body::new())
    } else {
        match as_body(request.link_body) {
            Some(body) => match tags::validate(&body) {
                Ok(()) => Some(body),
                Err(err) => {
                    problems.note("link_body.tags", "array", err);
                    None
                }
            },
            None => {
                problems.missing("link_body", "json");
                None
            }
        }
    };

    let (edge_type, target, body) = (edge_type?, target?, body?);
    let op = match operation {
        Operation::EdgeCreate => EdgeOp::Create {
            edge_type,
            target,
            body,
        },
        Operation::EdgeUpdate => EdgeOp::Update {
            edge_type,
            target,
            body,
        },
        _ => EdgeOp::Delete { edge_type, target },
    };
    Some((query_id, Message::Edge(op)))
}
