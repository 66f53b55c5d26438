//! Pure domain model for the kvgraph consistency core.
//!
//! Nothing in this crate performs I/O. It defines how vertices, edges and
//! tags are named ([`id`]), how they are laid out in a flat key-value
//! namespace ([`keys`], [`pattern`]), and how bodies and their tag index
//! evolve ([`body`], [`tags`]).

pub mod body;
pub mod error;
pub mod id;
pub mod keys;
pub mod pattern;
pub mod tags;

// Re-export commonly used types
pub use body::Body;
pub use error::CoreError;
pub use id::{EdgeType, QueryId, Tag, VertexId};
pub use keys::{InEdgeKey, OutEdgeKey, TagKey};
pub use pattern::KeyPattern;
pub use tags::TagSet;
