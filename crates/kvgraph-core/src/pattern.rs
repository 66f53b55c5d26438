//! Subject-style key patterns used for store enumeration.
//!
//! A pattern is a `.`-separated token list. `*` matches exactly one key
//! token and a trailing `>` matches one or more tokens; every other token
//! must match literally. `a.out.ltp_oid-bdy.>` therefore enumerates all
//! out-edges of `a` but not the body key `a` itself.

use crate::error::CoreError;
use crate::id::KEY_SEPARATOR;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Any,
    Tail,
}

/// A parsed key pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl KeyPattern {
    /// Parses a pattern, rejecting empty tokens and a non-terminal `>`.
    pub fn parse(pattern: &str) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let tokens: Vec<&str> = pattern.split(KEY_SEPARATOR).collect();
        let mut segments = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let segment = match *token {
                "" => return Err(invalid("empty token")),
                "*" => Segment::Any,
                ">" if i + 1 == tokens.len() => Segment::Tail,
                ">" => return Err(invalid("'>' must be the last token")),
                literal => Segment::Literal(literal.to_string()),
            };
            segments.push(segment);
        }

        Ok(KeyPattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        let mut tokens = key.split(KEY_SEPARATOR);
        for segment in &self.segments {
            match segment {
                Segment::Tail => return tokens.next().is_some(),
                Segment::Any => {
                    if tokens.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => match tokens.next() {
                    Some(tok) if tok == lit => {}
                    _ => return false,
                },
            }
        }
        tokens.next().is_none()
    }

    /// Longest key prefix shared by every matching key.
    ///
    /// Backends use it to narrow an ordered range scan before filtering with
    /// [`KeyPattern::matches`].
    pub fn literal_prefix(&self) -> String {
        let mut prefix = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    prefix.push_str(lit);
                    prefix.push(KEY_SEPARATOR);
                }
                Segment::Any | Segment::Tail => return prefix,
            }
        }
        // Fully literal pattern: the key itself.
        prefix.pop();
        prefix
    }
}
