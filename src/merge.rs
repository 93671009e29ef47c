//! Merge engine for decoded config payloads
//!
//! Folds an ordered list of mappings into one:
//! - Mappings: deep-merge by key (when merging is enabled)
//! - Sequences: concatenate, optionally dropping duplicate incoming items
//! - Scalars and mismatched types: later value wins

use crate::{Mapping, Value};
use serde::{Deserialize, Serialize};

/// How payloads from different files are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Recursively combine mappings and sequences instead of last-one-wins.
    pub merge: bool,
    /// When concatenating sequences, skip incoming items already present.
    pub merge_unique: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self { merge: true, merge_unique: false }
    }
}

impl MergePolicy {
    /// Last-one-wins at the top level, no recursion.
    pub fn overwrite() -> Self {
        Self { merge: false, merge_unique: false }
    }

    pub fn unique() -> Self {
        Self { merge: true, merge_unique: true }
    }
}

/// Fold payloads in order (first is base, last has highest precedence).
pub fn fold<'a, I>(payloads: I, policy: MergePolicy) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    payloads.into_iter().fold(Mapping::new(), |acc, payload| combine(&acc, payload, policy))
}

/// Combine `incoming` into `acc`, producing a new mapping. Neither input is
/// modified.
pub fn combine(acc: &Mapping, incoming: &Mapping, policy: MergePolicy) -> Mapping {
    let mut result = acc.clone();
    for (key, incoming_value) in incoming {
        let merged = match result.get(key) {
            Some(existing) => combine_values(existing, incoming_value, policy),
            None => incoming_value.clone(),
        };
        result.insert(key.clone(), merged);
    }
    result
}

fn combine_values(existing: &Value, incoming: &Value, policy: MergePolicy) -> Value {
    if !policy.merge {
        return incoming.clone();
    }

    match (existing, incoming) {
        (Value::Object(base), Value::Object(overlay)) => {
            Value::Object(combine(base, overlay, policy))
        }
        (Value::Array(base), Value::Array(overlay)) => {
            Value::Array(concat_sequences(base, overlay, policy.merge_unique))
        }
        // Scalars and any shape mismatch: incoming wins
        (_, overlay) => overlay.clone(),
    }
}

fn concat_sequences(base: &[Value], overlay: &[Value], unique: bool) -> Vec<Value> {
    let mut result = Vec::with_capacity(base.len() + overlay.len());
    result.extend(base.iter().cloned());
    for item in overlay {
        if unique && result.iter().any(|existing| same_item(existing, item)) {
            continue;
        }
        result.push(item.clone());
    }
    result
}

/// Value equality, except numbers compare numerically (`1 == 1.0`).
fn same_item(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_item(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| ys.get(key).is_some_and(|y| same_item(x, y)))
        }
        _ => a == b,
    }
}
