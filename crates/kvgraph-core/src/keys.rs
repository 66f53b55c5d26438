//! Key Codec: the mapping between graph elements and store keys.
//!
//! Four key templates linearize a vertex and its edges into the flat store
//! namespace, all rooted at the owning vertex id:
//!
//! | Record      | Key                                              | Value     |
//! |-------------|--------------------------------------------------|-----------|
//! | body        | `<id>`                                           | JSON body |
//! | out-edge    | `<id>.out.ltp_oid-bdy.<type>.<target>`           | edge body |
//! | in-edge     | `<id>.in.oid_ltp-nil.<source>.<type>`            | empty     |
//! | tag index   | `<id>.out.tag_ltp_oid-nil.<tag>.<type>.<target>` | empty     |
//!
//! Key fields are validated tokens (see [`crate::id::validate_token`]) so the
//! `.` separator never occurs inside a field and decoding is unambiguous.
//! Decoders still read the variable fields from the end of the key.

use smallvec::SmallVec;

use crate::error::CoreError;
use crate::id::{EdgeType, Tag, VertexId, KEY_SEPARATOR};

/// Segment introducing out-edge records (`ltp_oid-bdy`: type, target -> body).
pub const OUT_EDGE_SEGMENT: &str = "out.ltp_oid-bdy";

/// Segment introducing in-edge records (`oid_ltp-nil`: source, type -> nil).
pub const IN_EDGE_SEGMENT: &str = "in.oid_ltp-nil";

/// Segment introducing tag-index records (`tag_ltp_oid-nil`).
pub const TAG_SEGMENT: &str = "out.tag_ltp_oid-nil";

type Tokens<'a> = SmallVec<[&'a str; 8]>;

fn split(key: &str) -> Tokens<'_> {
    key.split(KEY_SEPARATOR).collect()
}

/// Checks that `tokens` is `<owner>.<segment...>.<n trailing fields>`.
fn has_layout(tokens: &Tokens<'_>, segment: &str, trailing: usize) -> bool {
    let segment: Tokens<'_> = split(segment);
    tokens.len() == 1 + segment.len() + trailing
        && tokens[1..=segment.len()] == segment[..]
}

fn malformed(kind: &'static str, key: &str) -> CoreError {
    CoreError::MalformedKey {
        kind,
        key: key.to_string(),
    }
}

/// Key of a vertex's body.
pub fn body_key(id: &VertexId) -> String {
    id.as_str().to_string()
}

/// Pattern enumerating every out-edge of `id`.
pub fn out_edges_pattern(id: &VertexId) -> String {
    format!("{id}.{OUT_EDGE_SEGMENT}.>")
}

/// Pattern enumerating every in-edge of `id`.
pub fn in_edges_pattern(id: &VertexId) -> String {
    format!("{id}.{IN_EDGE_SEGMENT}.>")
}

/// Pattern enumerating the tag-index entries of `id` carrying `tag`.
pub fn tagged_edges_pattern(id: &VertexId, tag: &Tag) -> String {
    format!("{id}.{TAG_SEGMENT}.{tag}.>")
}

/// Out-record of an edge, owned by the source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutEdgeKey {
    pub source: VertexId,
    pub edge_type: EdgeType,
    pub target: VertexId,
}

impl OutEdgeKey {
    pub fn new(source: VertexId, edge_type: EdgeType, target: VertexId) -> Self {
        OutEdgeKey {
            source,
            edge_type,
            target,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}.{OUT_EDGE_SEGMENT}.{}.{}",
            self.source, self.edge_type, self.target
        )
    }

    pub fn parse(key: &str) -> Result<Self, CoreError> {
        let tokens = split(key);
        if !has_layout(&tokens, OUT_EDGE_SEGMENT, 2) {
            return Err(malformed("out-edge", key));
        }
        let n = tokens.len();
        Ok(OutEdgeKey {
            source: VertexId::new(tokens[0])?,
            edge_type: EdgeType::new(tokens[n - 2])?,
            target: VertexId::new(tokens[n - 1])?,
        })
    }

    /// The mirrored in-record on the target vertex.
    pub fn mirror(&self) -> InEdgeKey {
        InEdgeKey {
            target: self.target.clone(),
            source: self.source.clone(),
            edge_type: self.edge_type.clone(),
        }
    }

    /// Pattern enumerating every tag-index entry of this edge.
    pub fn tags_pattern(&self) -> String {
        format!(
            "{}.{TAG_SEGMENT}.*.{}.{}",
            self.source, self.edge_type, self.target
        )
    }

    /// Tag-index key for `tag` on this edge.
    pub fn tag_key(&self, tag: &Tag) -> TagKey {
        TagKey {
            source: self.source.clone(),
            tag: tag.clone(),
            edge_type: self.edge_type.clone(),
            target: self.target.clone(),
        }
    }
}

/// In-record of an edge, owned by the target vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InEdgeKey {
    pub target: VertexId,
    pub source: VertexId,
    pub edge_type: EdgeType,
}

impl InEdgeKey {
    pub fn new(target: VertexId, source: VertexId, edge_type: EdgeType) -> Self {
        InEdgeKey {
            target,
            source,
            edge_type,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}.{IN_EDGE_SEGMENT}.{}.{}",
            self.target, self.source, self.edge_type
        )
    }

    pub fn parse(key: &str) -> Result<Self, CoreError> {
        let tokens = split(key);
        if !has_layout(&tokens, IN_EDGE_SEGMENT, 2) {
            return Err(malformed("in-edge", key));
        }
        let n = tokens.len();
        Ok(InEdgeKey {
            target: VertexId::new(tokens[0])?,
            source: VertexId::new(tokens[n - 2])?,
            edge_type: EdgeType::new(tokens[n - 1])?,
        })
    }

    /// The out-record this in-record mirrors.
    pub fn origin(&self) -> OutEdgeKey {
        OutEdgeKey {
            source: self.source.clone(),
            edge_type: self.edge_type.clone(),
            target: self.target.clone(),
        }
    }
}

/// Tag-index entry, owned by the source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub source: VertexId,
    pub tag: Tag,
    pub edge_type: EdgeType,
    pub target: VertexId,
}

impl TagKey {
    pub fn encode(&self) -> String {
        format!(
            "{}.{TAG_SEGMENT}.{}.{}.{}",
            self.source, self.tag, self.edge_type, self.target
        )
    }

    pub fn parse(key: &str) -> Result<Self, CoreError> {
        let tokens = split(key);
        if !has_layout(&tokens, TAG_SEGMENT, 3) {
            return Err(malformed("tag-index", key));
        }
        let n = tokens.len();
        Ok(TagKey {
            source: VertexId::new(tokens[0])?,
            tag: Tag::new(tokens[n - 3])?,
            edge_type: EdgeType::new(tokens[n - 2])?,
            target: VertexId::new(tokens[n - 1])?,
        })
    }

    /// The out-record this entry indexes.
    pub fn edge(&self) -> OutEdgeKey {
        OutEdgeKey {
            source: self.source.clone(),
            edge_type: self.edge_type.clone(),
            target: self.target.clone(),
        }
    }
}
