//! Serde helpers that emit compared values as bounded previews.
//!
//! Value graphs may be cyclic, so a difference tree never serialises the
//! values it points at in full.

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::Serializer;

use refeq_types::Value;

use crate::difference::Difference;

/// Container depth shown when a value is serialised.
pub const PREVIEW_DEPTH: usize = 2;

pub(crate) fn value<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.preview(PREVIEW_DEPTH))
}

pub(crate) fn values<S: Serializer>(values: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&value.preview(PREVIEW_DEPTH))?;
    }
    seq.end()
}

pub(crate) fn named<S: Serializer>(
    entries: &[(String, Difference)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (name, difference) in entries {
        map.serialize_entry(name, difference)?;
    }
    map.end()
}

/// Keyed entries become a list of `{ key, difference }` objects since keys
/// are arbitrary values.
pub(crate) fn keyed<S: Serializer>(
    entries: &[(Value, Difference)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(entries.len()))?;
    for (key, difference) in entries {
        seq.serialize_element(&KeyedEntry { key, difference })?;
    }
    seq.end()
}

struct KeyedEntry<'a> {
    key: &'a Value,
    difference: &'a Difference,
}

impl serde::Serialize for KeyedEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_struct("KeyedEntry", 2)?;
        entry.serialize_field("key", &self.key.preview(PREVIEW_DEPTH))?;
        entry.serialize_field("difference", self.difference)?;
        entry.end()
    }
}
