//! Bidirectional mapping between region codes and catalogue location names
//!
//! The pricing catalogue identifies regions by long descriptive names
//! (`US East (N. Virginia)`), while every other AWS API uses short codes
//! (`us-east-1`). A [`RegionMap`] is built once from a forward map and derives
//! the reverse direction at construction.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::warn;

/// Short code <-> long name lookup table.
///
/// Serializes as the flat `{code: long name}` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMap {
    forward: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
}

impl Serialize for RegionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.forward.serialize(serializer)
    }
}

impl RegionMap {
    /// Build a map from short code -> long name pairs.
    ///
    /// If two codes share a long name, the reverse direction keeps the first
    /// code in sorted order and the collision is logged.
    pub fn new(forward: BTreeMap<String, String>) -> Self {
        let mut reverse = BTreeMap::new();
        for (code, name) in &forward {
            if let Some(existing) = reverse.get(name) {
                warn!(
                    long_name = %name,
                    kept = %existing,
                    ignored = %code,
                    "Duplicate region long name"
                );
                continue;
            }
            reverse.insert(name.clone(), code.clone());
        }
        Self { forward, reverse }
    }

    /// Long catalogue name for a short code.
    pub fn long_name(&self, short_code: &str) -> Option<&str> {
        self.forward.get(short_code).map(String::as_str)
    }

    /// Short code for a long catalogue name.
    pub fn short_code(&self, long_name: &str) -> Option<&str> {
        self.reverse.get(long_name).map(String::as_str)
    }

    pub fn contains(&self, short_code: &str) -> bool {
        self.forward.contains_key(short_code)
    }

    /// Iterate `(short code, long name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl FromIterator<(String, String)> for RegionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
