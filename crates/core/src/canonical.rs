//! Canonical structural equality over turns.
//!
//! Persisted turns are compared against live turns by value, never by
//! identity or field order. The equality key is the turn serialized through
//! `serde_json::Value`, whose object representation keeps keys sorted, so
//! two records with the same field/value pairs always produce the same key
//! no matter how they were written to disk.

use std::collections::HashSet;

use tracing::warn;

use crate::turn::Turn;

/// Sorted-key JSON encoding of a turn, used as its equality key.
pub fn canonical_key(turn: &Turn) -> String {
    match serde_json::to_value(turn) {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!(error = %e, "Falling back to debug key for turn");
            format!("{turn:?}")
        }
    }
}

/// Turns in `a` that are not in `b`, preserving `a`'s order.
pub fn difference(a: &[Turn], b: &[Turn]) -> Vec<Turn> {
    let exclude: HashSet<String> = b.iter().map(canonical_key).collect();
    a.iter()
        .filter(|turn| !exclude.contains(&canonical_key(turn)))
        .cloned()
        .collect()
}

/// A new vec with `b` appended to `a`, leaving both inputs untouched.
pub fn append(a: &[Turn], b: &[Turn]) -> Vec<Turn> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}
