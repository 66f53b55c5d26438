//! Core error types for kvgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of identifier validation, key decoding and pattern parsing.

use thiserror::Error;

/// Core errors produced by the kvgraph-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A vertex id, edge type or tag is not a usable key token.
    #[error("invalid {kind} '{value}': {reason}")]
    InvalidToken {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A store key did not have the layout expected for its kind.
    #[error("malformed {kind} key: '{key}'")]
    MalformedKey { kind: &'static str, key: String },

    /// A key pattern could not be parsed.
    #[error("invalid key pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
}
