//! Differences between sequences, compared either index by index or as
//! unordered multisets.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use refeq_types::Value;

use crate::difference::Difference;
use crate::serialize;

// ---------------------------------------------------------------------------
// CollectionDifference
// ---------------------------------------------------------------------------

/// Index-by-index divergence between two sequences.
///
/// When the sizes differ, the trailing indices of the longer side are listed
/// as missing on that side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
    #[serde(serialize_with = "serialize::values")]
    pub left_items: Vec<Value>,
    #[serde(serialize_with = "serialize::values")]
    pub right_items: Vec<Value>,
    pub element_differences: BTreeMap<usize, Difference>,
    /// Indices present in the left sequence only.
    pub left_missing_indices: Vec<usize>,
    /// Indices present in the right sequence only.
    pub right_missing_indices: Vec<usize>,
}

impl CollectionDifference {
    pub fn new(
        reason: impl Into<String>,
        left: Value,
        right: Value,
        left_items: Vec<Value>,
        right_items: Vec<Value>,
    ) -> Self {
        Self {
            reason: reason.into(),
            left,
            right,
            left_items,
            right_items,
            element_differences: BTreeMap::new(),
            left_missing_indices: Vec::new(),
            right_missing_indices: Vec::new(),
        }
    }

    pub fn add_element_difference(&mut self, index: usize, difference: Difference) {
        self.element_differences.insert(index, difference);
    }

    pub fn add_left_missing_index(&mut self, index: usize) {
        self.left_missing_indices.push(index);
    }

    pub fn add_right_missing_index(&mut self, index: usize) {
        self.right_missing_indices.push(index);
    }

    pub fn element(&self, index: usize) -> Option<&Difference> {
        self.element_differences.get(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.element_differences.is_empty()
            && self.left_missing_indices.is_empty()
            && self.right_missing_indices.is_empty()
    }

    pub fn divergence_count(&self) -> usize {
        let elements: usize = self
            .element_differences
            .values()
            .map(Difference::divergence_count)
            .sum();
        elements + self.left_missing_indices.len() + self.right_missing_indices.len()
    }
}

// ---------------------------------------------------------------------------
// BestMatch
// ---------------------------------------------------------------------------

/// A pairing of a left element with the right element it most resembles.
///
/// `None` on either side means the element has no counterpart; it is shown
/// as `-1` when displayed or serialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BestMatch {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl BestMatch {
    pub fn new(left: Option<usize>, right: Option<usize>) -> Self {
        Self { left, right }
    }

    /// Both indices with `-1` standing in for a missing counterpart.
    pub fn indices(&self) -> (i64, i64) {
        (sentinel(self.left), sentinel(self.right))
    }
}

fn sentinel(index: Option<usize>) -> i64 {
    index.map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX))
}

impl fmt::Display for BestMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.indices();
        write!(f, "({left}, {right})")
    }
}

impl Serialize for BestMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (left, right) = self.indices();
        let mut pair = serializer.serialize_struct("BestMatch", 2)?;
        pair.serialize_field("left", &left)?;
        pair.serialize_field("right", &right)?;
        pair.end()
    }
}

// ---------------------------------------------------------------------------
// UnorderedCollectionDifference
// ---------------------------------------------------------------------------

/// Divergence between two sequences compared regardless of order.
///
/// Elements with an exact counterpart on the other side are left out. Every
/// remaining element is reported with its best match and the difference to
/// that match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnorderedCollectionDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
    #[serde(serialize_with = "serialize::values")]
    pub left_items: Vec<Value>,
    #[serde(serialize_with = "serialize::values")]
    pub right_items: Vec<Value>,
    #[serde(serialize_with = "serialize_best_matches")]
    pub best_matches: Vec<(BestMatch, Difference)>,
    /// Left indices that had no exact counterpart.
    pub left_unmatched: Vec<usize>,
    /// Right indices that had no exact counterpart.
    pub right_unmatched: Vec<usize>,
}

impl UnorderedCollectionDifference {
    pub fn new(
        reason: impl Into<String>,
        left: Value,
        right: Value,
        left_items: Vec<Value>,
        right_items: Vec<Value>,
    ) -> Self {
        Self {
            reason: reason.into(),
            left,
            right,
            left_items,
            right_items,
            best_matches: Vec::new(),
            left_unmatched: Vec::new(),
            right_unmatched: Vec::new(),
        }
    }

    pub fn add_best_match(&mut self, pair: BestMatch, difference: Difference) {
        self.best_matches.push((pair, difference));
    }

    /// Best match recorded for the left element at `left_index`.
    pub fn best_match_for(&self, left_index: usize) -> Option<(BestMatch, &Difference)> {
        self.best_matches
            .iter()
            .find(|(pair, _)| pair.left == Some(left_index))
            .map(|(pair, d)| (*pair, d))
    }

    /// Best match recorded for a right element that had no left counterpart.
    pub fn best_match_for_right(&self, right_index: usize) -> Option<(BestMatch, &Difference)> {
        self.best_matches
            .iter()
            .find(|(pair, _)| pair.left.is_none() && pair.right == Some(right_index))
            .map(|(pair, d)| (*pair, d))
    }

    pub fn is_empty(&self) -> bool {
        self.best_matches.is_empty()
    }

    pub fn divergence_count(&self) -> usize {
        self.best_matches
            .iter()
            .map(|(_, d)| d.divergence_count())
            .sum()
    }
}

fn serialize_best_matches<S: Serializer>(
    matches: &[(BestMatch, Difference)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(matches.len()))?;
    for (pair, difference) in matches {
        seq.serialize_element(&MatchEntry { pair, difference })?;
    }
    seq.end()
}

struct MatchEntry<'a> {
    pair: &'a BestMatch,
    difference: &'a Difference,
}

impl Serialize for MatchEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (left, right) = self.pair.indices();
        let mut entry = serializer.serialize_struct("MatchEntry", 3)?;
        entry.serialize_field("left", &left)?;
        entry.serialize_field("right", &right)?;
        entry.serialize_field("difference", self.difference)?;
        entry.end()
    }
}
