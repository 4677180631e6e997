//! Storage Abstraction (spec §4.1): a document map, per-instrument
//! price-ordered multisets, and tag sets — the three primitive views the
//! core requires, as a trait so a real backing store can be substituted
//! without touching engine code, the way [`crate::audit::AuditSink`] is
//! an injectable seam for the teacher's audit trail.
//!
//! Every operation here is atomic at single-key granularity; the engine
//! never assumes multi-key transactions (spec §4.1, §5).

use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use crate::error::StoreError;

/// One entry in a price-ordered multiset: a monotonic per-book sequence
/// number alongside the JSON-encoded member. The sequence is the
/// strategy-(b) tiebreaker spec §4.4 calls for: a store without
/// insertion-order guarantees over equal scores still yields FIFO because
/// ties are broken by `seq`, not by arrival into whatever structure holds
/// them.
#[derive(Clone, Debug, PartialEq)]
struct SeqMember {
    seq: u64,
    member: Value,
}

/// A price-ordered multiset: `price -> FIFO queue of members at that price`.
type Book = BTreeMap<Decimal, Vec<SeqMember>>;

/// The nine storage primitives spec §4.1 names, exactly.
pub trait Store: Send + Sync {
    /// Overwrites a document.
    fn doc_put(&self, key: &str, value: Value) -> Result<(), StoreError>;
    /// Returns the current document, or `None` if absent.
    fn doc_get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Inserts `member` into the sorted multiset at `key`, keyed by `score`.
    fn z_add(&self, key: &str, score: Decimal, member: Value) -> Result<(), StoreError>;
    /// All `(score, member)` pairs in ascending score order; ties broken by
    /// insertion order.
    fn z_range_asc(&self, key: &str) -> Result<Vec<(Decimal, Value)>, StoreError>;
    /// All `(score, member)` pairs in descending score order; ties broken
    /// by insertion order.
    fn z_range_desc(&self, key: &str) -> Result<Vec<(Decimal, Value)>, StoreError>;
    /// Removes an exact member match. Idempotent: removing an absent
    /// member is not an error.
    fn z_rem(&self, key: &str, member: &Value) -> Result<(), StoreError>;
    /// Inserts into a set. Idempotent.
    fn s_add(&self, key: &str, member: &str) -> Result<(), StoreError>;
    /// Enumerates set members.
    fn s_members(&self, key: &str) -> Result<HashSet<String>, StoreError>;
    /// Enumerates document keys starting with `prefix`. Used only for the
    /// unfiltered ledger query (spec §4.3 precedence rule).
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// In-memory realisation of [`Store`]. Book representation is agnostic per
/// spec §9; this crate holds the book in-process rather than behind a
/// network store. Guarded by one `Mutex` — per spec §5, "a global mutex
/// (correct but low-throughput)" is an explicitly acceptable realisation,
/// and [`crate::engine::MatchingEngine`] layers its own per-instrument
/// serialisation on top of this for throughput.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    docs: HashMap<String, Value>,
    books: HashMap<String, Book>,
    tags: HashMap<String, HashSet<String>>,
    next_seq: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn doc_put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        inner.docs.insert(key.to_string(), value);
        Ok(())
    }

    fn doc_get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner.docs.get(key).cloned())
    }

    fn z_add(&self, key: &str, score: Decimal, member: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .books
            .entry(key.to_string())
            .or_default()
            .entry(score)
            .or_default()
            .push(SeqMember { seq, member });
        Ok(())
    }

    fn z_range_asc(&self, key: &str) -> Result<Vec<(Decimal, Value)>, StoreError> {
        let inner = self.inner.lock().expect("store lock");
        let mut out = Vec::new();
        if let Some(book) = inner.books.get(key) {
            for (price, entries) in book.iter() {
                let mut entries = entries.clone();
                entries.sort_by_key(|e| e.seq);
                for e in entries {
                    out.push((*price, e.member));
                }
            }
        }
        Ok(out)
    }

    fn z_range_desc(&self, key: &str) -> Result<Vec<(Decimal, Value)>, StoreError> {
        let inner = self.inner.lock().expect("store lock");
        let mut out = Vec::new();
        if let Some(book) = inner.books.get(key) {
            for (price, entries) in book.iter().rev() {
                let mut entries = entries.clone();
                entries.sort_by_key(|e| e.seq);
                for e in entries {
                    out.push((*price, e.member));
                }
            }
        }
        Ok(out)
    }

    fn z_rem(&self, key: &str, member: &Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        if let Some(book) = inner.books.get_mut(key) {
            let mut empty_prices = Vec::new();
            for (price, entries) in book.iter_mut() {
                if let Some(pos) = entries.iter().position(|e| &e.member == member) {
                    entries.remove(pos);
                }
                if entries.is_empty() {
                    empty_prices.push(*price);
                }
            }
            for p in empty_prices {
                book.remove(&p);
            }
        }
        Ok(())
    }

    fn s_add(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        inner
            .tags
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    fn s_members(&self, key: &str) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner.tags.get(key).cloned().unwrap_or_default())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner
            .docs
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doc_put_get_roundtrip() {
        let store = InMemoryStore::new();
        store.doc_put("k", json!({"a": 1})).unwrap();
        assert_eq!(store.doc_get("k").unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.doc_get("missing").unwrap(), None);
    }

    #[test]
    fn z_range_asc_and_desc_order_by_score() {
        let store = InMemoryStore::new();
        store.z_add("book", Decimal::from(100), json!("a")).unwrap();
        store.z_add("book", Decimal::from(50), json!("b")).unwrap();
        store.z_add("book", Decimal::from(75), json!("c")).unwrap();
        let asc = store.z_range_asc("book").unwrap();
        assert_eq!(
            asc.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            vec![Decimal::from(50), Decimal::from(75), Decimal::from(100)]
        );
        let desc = store.z_range_desc("book").unwrap();
        assert_eq!(
            desc.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            vec![Decimal::from(100), Decimal::from(75), Decimal::from(50)]
        );
    }

    #[test]
    fn z_range_ties_broken_by_insertion_order() {
        let store = InMemoryStore::new();
        store.z_add("book", Decimal::from(100), json!("first")).unwrap();
        store.z_add("book", Decimal::from(100), json!("second")).unwrap();
        let asc = store.z_range_asc("book").unwrap();
        assert_eq!(
            asc.iter().map(|(_, m)| m.clone()).collect::<Vec<_>>(),
            vec![json!("first"), json!("second")]
        );
    }

    #[test]
    fn z_rem_removes_exact_member_and_is_idempotent() {
        let store = InMemoryStore::new();
        store.z_add("book", Decimal::from(100), json!("a")).unwrap();
        store.z_rem("book", &json!("a")).unwrap();
        assert!(store.z_range_asc("book").unwrap().is_empty());
        // second removal is a no-op, not an error
        store.z_rem("book", &json!("a")).unwrap();
    }

    #[test]
    fn s_add_is_idempotent_and_s_members_enumerates() {
        let store = InMemoryStore::new();
        store.s_add("tag", "x").unwrap();
        store.s_add("tag", "x").unwrap();
        store.s_add("tag", "y").unwrap();
        let members = store.s_members("tag").unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains("x"));
        assert!(members.contains("y"));
    }

    #[test]
    fn scan_prefix_only_matches_prefix() {
        let store = InMemoryStore::new();
        store.doc_put("bonds:trades:1", json!({})).unwrap();
        store.doc_put("bonds:trades:2", json!({})).unwrap();
        store.doc_put("bonds:orders:1", json!({})).unwrap();
        let mut keys = store.scan_prefix("bonds:trades:").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["bonds:trades:1", "bonds:trades:2"]);
    }
}
