use refeq_diff::Difference;
use refeq_types::{ComparisonModes, Value, ValueKind};

use crate::engine::Comparison;
use crate::error::EngineResult;

// ---------------------------------------------------------------------------
// ValuePair
// ---------------------------------------------------------------------------

/// The (expected, actual) values handed to a comparator, classified once.
#[derive(Clone, Copy, Debug)]
pub struct ValuePair<'a> {
    pub left: &'a Value,
    pub right: &'a Value,
    pub left_kind: ValueKind,
    pub right_kind: ValueKind,
}

impl<'a> ValuePair<'a> {
    pub fn new(left: &'a Value, right: &'a Value) -> Self {
        Self {
            left,
            right,
            left_kind: left.kind(),
            right_kind: right.kind(),
        }
    }

    /// Returns `true` if both sides are of `kind`.
    pub fn both(&self, kind: ValueKind) -> bool {
        self.left_kind == kind && self.right_kind == kind
    }

    /// Returns `true` if at least one side is of `kind`.
    pub fn either(&self, kind: ValueKind) -> bool {
        self.left_kind == kind || self.right_kind == kind
    }

    /// Returns `true` if neither side is null.
    pub fn both_present(&self) -> bool {
        self.left_kind != ValueKind::Null && self.right_kind != ValueKind::Null
    }

    /// A leaf difference over this pair.
    pub fn leaf(&self, reason: impl Into<String>) -> Difference {
        Difference::leaf(reason, self.left.clone(), self.right.clone())
    }
}

// ---------------------------------------------------------------------------
// Comparator trait
// ---------------------------------------------------------------------------

/// One strategy in the comparator chain.
///
/// The engine asks each comparator in order whether it applies to a pair;
/// the first that does performs the comparison, recursing into the engine
/// through the [`Comparison`] for nested values.
///
/// The trait is object-safe and `Send + Sync` so comparators can be stored
/// in a `Vec<Box<dyn Comparator>>` shared by concurrent comparisons.
pub trait Comparator: Send + Sync {
    /// Human-readable name of this comparator (e.g., "map", "structural").
    fn name(&self) -> &str;

    /// Whether this comparator handles `pair` under `modes`.
    fn applies(&self, pair: &ValuePair<'_>, modes: ComparisonModes) -> bool;

    /// Compare the pair, returning `None` if it is equivalent.
    ///
    /// When [`Comparison::stop_at_first`] is set, return as soon as one
    /// child divergence is known.
    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_classification() {
        let left = Value::from(1);
        let right = Value::Null;
        let pair = ValuePair::new(&left, &right);
        assert!(pair.either(ValueKind::Number));
        assert!(!pair.both(ValueKind::Number));
        assert!(!pair.both_present());
    }

    #[test]
    fn leaf_keeps_both_values() {
        let left = Value::list([]);
        let right = Value::from("x");
        let d = ValuePair::new(&left, &right).leaf("Different values");
        assert!(d.left().is_same_reference(&left));
        assert_eq!(d.right(), &right);
    }
}
