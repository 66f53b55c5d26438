//! Reply envelope shared by every actor operation.
//!
//! [`Reply`] is what a vertex, edge or mirror operation hands back to its
//! caller (or publishes on the egress channel for signals). Callers treat
//! `ok` with an empty result as success; `failed` carries a message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kvgraph_core::QueryId;

/// Outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Failed,
}

/// Reply to an operation: `{"status": "ok" | "failed", "result": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub status: Status,
    pub result: Value,
}

impl Reply {
    /// A successful reply with an empty result.
    pub fn ok() -> Self {
        Reply::ok_with("")
    }

    pub fn ok_with(result: impl Into<Value>) -> Self {
        Reply {
            status: Status::Ok,
            result: result.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Reply {
            status: Status::Failed,
            result: Value::String(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// The result rendered as text, for logs and error accumulation.
    pub fn message(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A signal's reply as published on the egress channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedReply {
    pub query_id: QueryId,
    /// Rendered address of the actor that produced the reply.
    pub address: String,
    pub reply: Reply,
}

/// Acknowledgement returned when a signal has been accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalAccepted {
    pub query_id: QueryId,
}
