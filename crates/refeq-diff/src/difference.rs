//! The difference tree root type and its terminal variants.

use std::fmt;

use serde::Serialize;

use refeq_types::Value;

use crate::collection::{BestMatch, CollectionDifference, UnorderedCollectionDifference};
use crate::map::MapDifference;
use crate::object::ObjectDifference;
use crate::serialize;

// ---------------------------------------------------------------------------
// LeafDifference
// ---------------------------------------------------------------------------

/// A divergence with no further structure: a value mismatch, a null on one
/// side, or a temporal value present on only one side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeafDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
}

impl LeafDifference {
    pub fn new(reason: impl Into<String>, left: Value, right: Value) -> Self {
        Self {
            reason: reason.into(),
            left,
            right,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassDifference
// ---------------------------------------------------------------------------

/// The runtime types of the two values cannot be compared field by field:
/// the left type is not assignable from the right type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
    pub left_type: String,
    pub right_type: String,
}

impl ClassDifference {
    /// Build a class difference, naming both runtime types in the reason.
    pub fn new(left: Value, right: Value) -> Self {
        let left_type = left.type_name();
        let right_type = right.type_name();
        Self {
            reason: format!("Different classes. Left: {left_type}, right: {right_type}"),
            left,
            right,
            left_type,
            right_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Difference
// ---------------------------------------------------------------------------

/// A node in the difference tree.
///
/// "No difference" is never a node: a comparison that finds nothing returns
/// `None` instead, so every node in a tree is an actual divergence. `left`
/// and `right` on each node are the compared values themselves (clones of
/// the same handles), so a renderer can inspect the source graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    Leaf(LeafDifference),
    Class(ClassDifference),
    Object(ObjectDifference),
    Map(MapDifference),
    Collection(CollectionDifference),
    Unordered(UnorderedCollectionDifference),
}

impl Difference {
    /// Shorthand for a [`LeafDifference`] node.
    pub fn leaf(reason: impl Into<String>, left: Value, right: Value) -> Self {
        Self::Leaf(LeafDifference::new(reason, left, right))
    }

    /// Shorthand for a [`ClassDifference`] node.
    pub fn class(left: Value, right: Value) -> Self {
        Self::Class(ClassDifference::new(left, right))
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Leaf(d) => &d.reason,
            Self::Class(d) => &d.reason,
            Self::Object(d) => &d.reason,
            Self::Map(d) => &d.reason,
            Self::Collection(d) => &d.reason,
            Self::Unordered(d) => &d.reason,
        }
    }

    /// The expected-side value.
    pub fn left(&self) -> &Value {
        match self {
            Self::Leaf(d) => &d.left,
            Self::Class(d) => &d.left,
            Self::Object(d) => &d.left,
            Self::Map(d) => &d.left,
            Self::Collection(d) => &d.left,
            Self::Unordered(d) => &d.left,
        }
    }

    /// The actual-side value.
    pub fn right(&self) -> &Value {
        match self {
            Self::Leaf(d) => &d.right,
            Self::Class(d) => &d.right,
            Self::Object(d) => &d.right,
            Self::Map(d) => &d.right,
            Self::Collection(d) => &d.right,
            Self::Unordered(d) => &d.right,
        }
    }

    /// Variant name, as used in serialised output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::Class(_) => "class",
            Self::Object(_) => "object",
            Self::Map(_) => "map",
            Self::Collection(_) => "collection",
            Self::Unordered(_) => "unordered",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_) | Self::Class(_))
    }

    /// Number of leaf-level divergences below (and including) this node.
    ///
    /// Terminal nodes count one. Composite nodes sum their children and add
    /// one for every missing key or index. This is the distance used to pick
    /// best matches between unordered elements.
    pub fn divergence_count(&self) -> usize {
        match self {
            Self::Leaf(_) | Self::Class(_) => 1,
            Self::Object(d) => d.divergence_count(),
            Self::Map(d) => d.divergence_count(),
            Self::Collection(d) => d.divergence_count(),
            Self::Unordered(d) => d.divergence_count(),
        }
    }

    // -- navigation ---------------------------------------------------------

    /// Child difference for the field `name` of an object difference.
    pub fn field(&self, name: &str) -> Option<&Difference> {
        match self {
            Self::Object(d) => d.field(name),
            _ => None,
        }
    }

    /// Child difference for the value under `key` of a map difference.
    pub fn value_difference(&self, key: &Value) -> Option<&Difference> {
        match self {
            Self::Map(d) => d.value_difference(key),
            _ => None,
        }
    }

    /// Child difference for element `index` of an ordered collection.
    pub fn element(&self, index: usize) -> Option<&Difference> {
        match self {
            Self::Collection(d) => d.element(index),
            _ => None,
        }
    }

    /// Best match chosen for the left element at `left_index` of an
    /// unordered collection difference.
    pub fn best_match_for(&self, left_index: usize) -> Option<(BestMatch, &Difference)> {
        match self {
            Self::Unordered(d) => d.best_match_for(left_index),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectDifference> {
        match self {
            Self::Object(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapDifference> {
        match self {
            Self::Map(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionDifference> {
        match self {
            Self::Collection(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_unordered(&self) -> Option<&UnorderedCollectionDifference> {
        match self {
            Self::Unordered(d) => Some(d),
            _ => None,
        }
    }
}

impl From<LeafDifference> for Difference {
    fn from(d: LeafDifference) -> Self {
        Self::Leaf(d)
    }
}

impl From<ClassDifference> for Difference {
    fn from(d: ClassDifference) -> Self {
        Self::Class(d)
    }
}

impl From<ObjectDifference> for Difference {
    fn from(d: ObjectDifference) -> Self {
        Self::Object(d)
    }
}

impl From<MapDifference> for Difference {
    fn from(d: MapDifference) -> Self {
        Self::Map(d)
    }
}

impl From<CollectionDifference> for Difference {
    fn from(d: CollectionDifference) -> Self {
        Self::Collection(d)
    }
}

impl From<UnorderedCollectionDifference> for Difference {
    fn from(d: UnorderedCollectionDifference) -> Self {
        Self::Unordered(d)
    }
}

/// One-line summary of the node itself, without its children.
impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {}",
            self.reason(),
            self.left(),
            self.right()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refeq_types::TypeDescriptor;

    #[test]
    fn leaf_counts_once() {
        let d = Difference::leaf("Different values", Value::from(1), Value::from(2));
        assert_eq!(d.divergence_count(), 1);
        assert!(d.is_leaf());
        assert_eq!(d.kind(), "leaf");
    }

    #[test]
    fn class_difference_names_both_types() {
        let ty = TypeDescriptor::builder("Person").field("name").build();
        let record = Value::record(&ty, []).unwrap();
        let d = Difference::class(record.clone(), Value::from("x"));
        assert_eq!(d.reason(), "Different classes. Left: Person, right: string");
        assert!(d.left().is_same_reference(&record));
        assert_eq!(d.divergence_count(), 1);
    }

    #[test]
    fn navigation_on_wrong_variant_is_none() {
        let d = Difference::leaf("Different values", Value::from(1), Value::from(2));
        assert!(d.field("x").is_none());
        assert!(d.element(0).is_none());
        assert!(d.value_difference(&Value::from("k")).is_none());
        assert!(d.best_match_for(0).is_none());
    }

    #[test]
    fn display_is_one_line() {
        let d = Difference::leaf("Different values", Value::from("a"), Value::from("b"));
        assert_eq!(d.to_string(), r#"Different values: expected "a", actual "b""#);
    }

    #[test]
    fn leaf_serializes_with_previews() {
        let d = Difference::leaf("Different values", Value::from(1), Value::Null);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "leaf");
        assert_eq!(json["left"], "1");
        assert_eq!(json["right"], "null");
    }
}
