//! Identifier newtypes for graph entities.
//!
//! Vertex ids, edge types and tags all end up as fields of a `.`-separated
//! store key, so each is a distinct newtype over `String` that can only be
//! built from a valid key token. A [`QueryId`] is a free-form correlation
//! token and is never embedded in a key.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Separator between the fields of a store key.
pub const KEY_SEPARATOR: char = '.';

/// Marker reserved for actor address aliases (`<id>===mirror`).
pub const ALIAS_MARKER: &str = "===";

/// Checks that `value` can be used as a single key field.
///
/// A token is non-empty and contains neither the key separator, the pattern
/// wildcards `*` and `>`, nor the alias marker.
pub fn validate_token(kind: &'static str, value: &str) -> Result<(), CoreError> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value.contains(KEY_SEPARATOR) {
        Some("must not contain '.'")
    } else if value.contains('*') || value.contains('>') {
        Some("must not contain the wildcards '*' or '>'")
    } else if value.contains(ALIAS_MARKER) {
        Some("must not contain '==='")
    } else if value.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::InvalidToken {
            kind,
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Fresh identifier for synthesized vertices, edge types and query ids.
fn unique_str_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Globally unique vertex identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VertexId(String);

/// Edge type; at most one edge of a type links an ordered vertex pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeType(String);

/// Edge tag, indexed in the source vertex's namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

/// Correlation token bracketing one logical multi-key mutation.
///
/// Two concurrently in-flight mutations must never share a query id; the
/// store would merge their scopes. Callers that do not supply one get a
/// fresh id per top-level request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub String);

impl VertexId {
    /// Builds a vertex id, validating it as a key token.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        validate_token("vertex id", &value)?;
        Ok(VertexId(value))
    }

    /// Synthesizes a fresh vertex id.
    pub fn generate() -> Self {
        VertexId(unique_str_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EdgeType {
    /// Builds an edge type, validating it as a key token.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        validate_token("edge type", &value)?;
        Ok(EdgeType(value))
    }

    /// Synthesizes a fresh edge type.
    pub fn generate() -> Self {
        EdgeType(unique_str_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Tag {
    /// Builds a tag, validating it as a key token.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        validate_token("tag", &value)?;
        Ok(Tag(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl QueryId {
    /// Mints a fresh query id.
    pub fn generate() -> Self {
        QueryId(unique_str_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Conversions used by serde's `try_from`/`into`.

impl TryFrom<String> for VertexId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VertexId::new(value)
    }
}

impl TryFrom<String> for EdgeType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EdgeType::new(value)
    }
}

impl TryFrom<String> for Tag {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::new(value)
    }
}

impl From<VertexId> for String {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl From<EdgeType> for String {
    fn from(ty: EdgeType) -> Self {
        ty.0
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
