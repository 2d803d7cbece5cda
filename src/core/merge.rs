//! Recursive JSON merge
//!
//! Merges an overlay document into a base document. Objects are merged key by
//! key down to a configurable depth; everything else (scalars, arrays, objects
//! below the depth limit) is replaced by the overlay value. Keys only present
//! in the base are kept.
//!
//! Depth counts how many object levels below the root are merged rather than
//! replaced: depth 0 behaves like a plain top-level update, depth 1 merges the
//! members of top-level objects, and so on.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// How far below the root objects are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeDepth {
    /// Merge this many object levels below the root
    Limited(usize),
    /// Merge every nested object
    #[default]
    Unlimited,
}

impl MergeDepth {
    /// Depth remaining after descending one level, `None` if exhausted
    fn descend(self) -> Option<Self> {
        match self {
            Self::Limited(0) => None,
            Self::Limited(n) => Some(Self::Limited(n - 1)),
            Self::Unlimited => Some(Self::Unlimited),
        }
    }
}

impl fmt::Display for MergeDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl FromStr for MergeDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unlimited" | "full" => Ok(Self::Unlimited),
            _ => s
                .parse::<usize>()
                .map(Self::Limited)
                .map_err(|_| format!("invalid merge depth '{s}': expected a number or 'unlimited'")),
        }
    }
}

/// Merge `overlay` into `base`
///
/// A non-object overlay replaces `base` entirely; a non-object base is
/// replaced by an empty object before merging.
pub fn merge(base: &mut Value, overlay: Value, depth: MergeDepth) {
    let Value::Object(overlay) = overlay else {
        *base = overlay;
        return;
    };

    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    if let Value::Object(target) = base {
        merge_objects(target, overlay, depth);
    }
}

fn merge_objects(target: &mut Map<String, Value>, overlay: Map<String, Value>, depth: MergeDepth) {
    for (key, value) in overlay {
        match (value, depth.descend()) {
            (value @ Value::Object(_), Some(next)) => {
                let slot = target.entry(key).or_insert_with(|| Value::Object(Map::new()));
                merge(slot, value, next);
            }
            (value, _) => {
                target.insert(key, value);
            }
        }
    }
}
