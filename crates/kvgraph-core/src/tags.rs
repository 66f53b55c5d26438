//! Tag Index derivation from edge bodies.
//!
//! An edge body may carry `tags`, an array of strings. Each tag yields one
//! empty marker record in the source vertex's namespace. Whenever a body is
//! replaced the index is recomputed as a set difference: tags missing from
//! the new body are retracted before the body write, and the new body's tags
//! are (re)written after it.

use indexmap::IndexSet;
use serde_json::Value;

use crate::body::Body;
use crate::error::CoreError;
use crate::id::Tag;

/// Body field holding the tag list.
pub const TAGS_FIELD: &str = "tags";

/// Ordered, de-duplicated set of tags.
pub type TagSet = IndexSet<Tag>;

/// Validates the `tags` field of an incoming body.
///
/// A non-empty `tags` array must contain only strings that are valid key
/// tokens. Any other JSON kind under `tags` is stored but not indexed.
pub fn validate(body: &Body) -> Result<(), CoreError> {
    let Some(Value::Array(items)) = body.get(TAGS_FIELD) else {
        return Ok(());
    };
    for item in items {
        match item {
            Value::String(s) => {
                Tag::new(s.as_str())?;
            }
            other => {
                return Err(CoreError::InvalidToken {
                    kind: "tag",
                    value: other.to_string(),
                    reason: "must be a string",
                })
            }
        }
    }
    Ok(())
}

/// Tags derived from a stored body.
///
/// Returns an empty set unless `tags` is an array of strings. Elements that
/// are not valid tokens are skipped; they can only come from data written
/// outside this layer.
pub fn tags_of(body: &Body) -> TagSet {
    let Some(Value::Array(items)) = body.get(TAGS_FIELD) else {
        return TagSet::new();
    };
    if !items.iter().all(Value::is_string) {
        return TagSet::new();
    }
    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| Tag::new(s).ok())
        .collect()
}

/// Index changes needed when a body's tag set goes from `old` to `new`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagDiff {
    /// Tags whose markers must be removed.
    pub stale: Vec<Tag>,
    /// Tags whose markers must exist afterwards.
    pub current: Vec<Tag>,
}

pub fn diff(old: &TagSet, new: &TagSet) -> TagDiff {
    TagDiff {
        stale: old.difference(new).cloned().collect(),
        current: new.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::as_body;
    use serde_json::json;

    fn body(v: Value) -> Body {
        as_body(Some(v)).unwrap()
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(Tag::as_str).collect()
    }

    #[test]
    fn derives_tags_in_order_without_duplicates() {
        let tags = tags_of(&body(json!({"tags": ["t2", "t1", "t2"]})));
        let tags: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(tags, vec!["t2", "t1"]);
    }

    #[test]
    fn non_array_or_mixed_tags_are_not_indexed() {
        assert!(tags_of(&body(json!({"tags": {}}))).is_empty());
        assert!(tags_of(&body(json!({"tags": ["t1", 3]}))).is_empty());
        assert!(tags_of(&body(json!({"name": "x"}))).is_empty());
        assert!(tags_of(&body(json!({"tags": []}))).is_empty());
    }

    #[test]
    fn validation_rejects_unindexable_tags() {
        assert!(validate(&body(json!({"tags": ["ok", "also-ok"]}))).is_ok());
        assert!(validate(&body(json!({"tags": {}}))).is_ok());
        assert!(validate(&body(json!({"tags": ["a.b"]}))).is_err());
        assert!(validate(&body(json!({"tags": [1]}))).is_err());
    }

    #[test]
    fn diff_retracts_only_dropped_tags() {
        let old = tags_of(&body(json!({"tags": ["t1", "t2"]})));
        let new = tags_of(&body(json!({"tags": ["t2", "t3"]})));
        let d = diff(&old, &new);
        assert_eq!(names(&d.stale), vec!["t1"]);
        assert_eq!(names(&d.current), vec!["t2", "t3"]);
    }
}
