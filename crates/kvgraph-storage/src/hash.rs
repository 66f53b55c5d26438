//! Deterministic content digests over a key range using blake3.
//!
//! A digest covers every key matching a pattern together with its value, in
//! scan order. Two stores (or one store at two points in time) holding the
//! same records under a pattern produce the same digest, which makes
//! idempotence checks cheap. Digests are derived state, never stored.

use kvgraph_core::KeyPattern;

use crate::error::StorageError;
use crate::traits::KvStore;

/// Computes the digest of all records matching `pattern`.
///
/// Keys and values are length-prefixed so adjacent fields cannot alias.
/// A key that disappears between the scan and the lookup is skipped.
pub fn digest(store: &dyn KvStore, pattern: &KeyPattern) -> Result<blake3::Hash, StorageError> {
    let mut hasher = blake3::Hasher::new();
    for key in store.scan(pattern)? {
        let Some(value) = store.get(&key)? else {
            continue;
        };
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(&value);
    }
    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use kvgraph_core::QueryId;

    #[test]
    fn same_records_same_digest() {
        let q = QueryId("q".into());
        let all = KeyPattern::parse(">").unwrap();

        let a = InMemoryStore::new();
        a.set("x", b"{}", &q).unwrap();
        a.set("x.in.oid_ltp-nil.y.t", b"", &q).unwrap();

        let b = InMemoryStore::new();
        b.set("x.in.oid_ltp-nil.y.t", b"", &q).unwrap();
        b.set("x", b"{}", &q).unwrap();

        assert_eq!(digest(&a, &all).unwrap(), digest(&b, &all).unwrap());

        b.set("x", br#"{"k":1}"#, &q).unwrap();
        assert_ne!(digest(&a, &all).unwrap(), digest(&b, &all).unwrap());
    }

    #[test]
    fn digest_is_scoped_to_the_pattern() {
        let q = QueryId("q".into());
        let store = InMemoryStore::new();
        store.set("x.out.ltp_oid-bdy.t.y", b"{}", &q).unwrap();
        let out = KeyPattern::parse("x.out.ltp_oid-bdy.>").unwrap();
        let before = digest(&store, &out).unwrap();

        store.set("z", b"{}", &q).unwrap();
        assert_eq!(digest(&store, &out).unwrap(), before);
    }
}
