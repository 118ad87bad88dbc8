use refeq_diff::Difference;
use refeq_types::ComparisonModes;

use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::EngineResult;

/// Under lenient dates, temporal values only need to be present on both
/// sides; the instants themselves are never compared.
///
/// Applies when both sides are temporal values of the same kind, or when
/// one side is temporal and the other null.
pub struct LenientDatesComparator;

impl Comparator for LenientDatesComparator {
    fn name(&self) -> &str {
        "lenient-dates"
    }

    fn applies(&self, pair: &ValuePair<'_>, modes: ComparisonModes) -> bool {
        if !modes.lenient_dates {
            return false;
        }
        match (pair.left.as_temporal(), pair.right.as_temporal()) {
            (Some(left), Some(right)) => left.kind() == right.kind(),
            (Some(_), None) => pair.right.is_null(),
            (None, Some(_)) => pair.left.is_null(),
            (None, None) => false,
        }
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        _comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        if pair.both_present() {
            return Ok(None);
        }
        Ok(Some(pair.leaf(
            "Lenient dates, but not both instantiated or both null",
        )))
    }
}
