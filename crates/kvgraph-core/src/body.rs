//! Vertex and edge bodies.
//!
//! A body is a JSON object. Bodies are created by replacement and mutated
//! only through [`deep_merge`]: nested objects are merged recursively while
//! scalars and arrays in the patch overwrite what was stored.

use serde_json::{Map, Value};

/// A vertex or edge body.
pub type Body = Map<String, Value>;

/// Merges `patch` into `base`.
pub fn deep_merge(base: &mut Body, patch: Body) {
    for (key, incoming) in patch {
        match (base.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                deep_merge(existing, nested);
            }
            (_, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

/// Returns the object inside `value`, or `None` for any other JSON kind.
pub fn as_body(value: Option<Value>) -> Option<Body> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Serializes a body to its stored representation.
pub fn encode(body: &Body) -> Vec<u8> {
    // A Map<String, Value> always serializes.
    serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec())
}

/// Parses a stored body. Non-object JSON reads as an empty body.
pub fn decode(bytes: &[u8]) -> Result<Body, serde_json::Error> {
    if bytes.is_empty() {
        return Ok(Body::new());
    }
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(as_body(Some(value)).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Body {
        as_body(Some(v)).unwrap()
    }

    #[test]
    fn merge_adds_and_overwrites_top_level_fields() {
        let mut b = body(json!({"x": 1}));
        deep_merge(&mut b, body(json!({"y": 2})));
        assert_eq!(Value::Object(b.clone()), json!({"x": 1, "y": 2}));

        deep_merge(&mut b, body(json!({"x": 3})));
        assert_eq!(Value::Object(b), json!({"x": 3, "y": 2}));
    }

    #[test]
    fn merge_recurses_into_objects() {
        let mut b = body(json!({"meta": {"a": 1, "b": {"c": 2}}}));
        deep_merge(&mut b, body(json!({"meta": {"b": {"d": 4}, "e": 5}})));
        assert_eq!(
            Value::Object(b),
            json!({"meta": {"a": 1, "b": {"c": 2, "d": 4}, "e": 5}})
        );
    }

    #[test]
    fn merge_replaces_arrays_and_mismatched_kinds() {
        let mut b = body(json!({"tags": ["t1", "t2"], "n": {"x": 1}}));
        deep_merge(&mut b, body(json!({"tags": ["t2"], "n": 7})));
        assert_eq!(Value::Object(b), json!({"tags": ["t2"], "n": 7}));
    }

    #[test]
    fn decode_tolerates_empty_and_non_object_values() {
        assert!(decode(b"").unwrap().is_empty());
        assert!(decode(b"[1,2]").unwrap().is_empty());
        assert!(decode(b"{not json").is_err());
        let b = body(json!({"k": "v"}));
        assert_eq!(decode(&encode(&b)).unwrap(), b);
    }
}
