use refeq_diff::{CollectionDifference, Difference};
use refeq_types::{ComparisonModes, ValueKind};

use crate::comparators::{both_sets, seq_items};
use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::EngineResult;

/// Index-by-index comparison of two sequences of any flavour.
///
/// Active unless lenient order is set or both sides are sets. Trailing elements of the longer
/// sequence are recorded as missing indices.
pub struct OrderedCollectionComparator;

impl Comparator for OrderedCollectionComparator {
    fn name(&self) -> &str {
        "ordered-collection"
    }

    fn applies(&self, pair: &ValuePair<'_>, modes: ComparisonModes) -> bool {
        !modes.lenient_order && pair.both(ValueKind::Seq) && !both_sets(pair)
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        let left_items = seq_items(pair.left)?;
        let right_items = seq_items(pair.right)?;
        let mut difference = CollectionDifference::new(
            "Different elements",
            pair.left.clone(),
            pair.right.clone(),
            left_items.clone(),
            right_items.clone(),
        );

        for (index, (left, right)) in left_items.iter().zip(&right_items).enumerate() {
            if let Some(element) = comparison.difference(left, right)? {
                difference.add_element_difference(index, element);
                if comparison.stop_at_first() {
                    return Ok(Some(difference.into()));
                }
            }
        }

        let common = left_items.len().min(right_items.len());
        for index in common..left_items.len() {
            difference.add_left_missing_index(index);
        }
        for index in common..right_items.len() {
            difference.add_right_missing_index(index);
        }

        if difference.is_empty() {
            return Ok(None);
        }
        Ok(Some(difference.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refeq_types::{TypeError, Value};

    use crate::{EngineError, EquivalenceEngine};

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::from))
    }

    fn compare(left: &Value, right: &Value, stop_at_first: bool) -> Option<Difference> {
        EquivalenceEngine::default()
            .difference_with(left, right, ComparisonModes::strict(), stop_at_first)
            .unwrap()
    }

    #[test]
    fn equal_sequences() {
        assert!(compare(&ints(&[1, 2, 3]), &ints(&[1, 2, 3]), false).is_none());
    }

    #[test]
    fn array_and_list_compare_as_sequences() {
        let array = Value::array([Value::from(1)]);
        assert!(compare(&array, &ints(&[1]), false).is_none());
    }

    #[test]
    fn element_differences_by_index() {
        let d = compare(&ints(&[1, 2, 3]), &ints(&[1, 5, 6]), false).unwrap();
        let collection = d.as_collection().unwrap();
        let indices: Vec<_> = collection.element_differences.keys().copied().collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(collection.left_items.len(), 3);
    }

    #[test]
    fn trailing_elements_are_missing() {
        let d = compare(&ints(&[1, 2, 3]), &ints(&[1]), false).unwrap();
        let collection = d.as_collection().unwrap();
        assert!(collection.element_differences.is_empty());
        assert_eq!(collection.left_missing_indices, vec![1, 2]);
        assert!(collection.right_missing_indices.is_empty());

        let d = compare(&ints(&[]), &ints(&[7]), false).unwrap();
        assert_eq!(d.as_collection().unwrap().right_missing_indices, vec![0]);
    }

    #[test]
    fn stop_at_first_keeps_one_element() {
        let d = compare(&ints(&[1, 2, 3]), &ints(&[4, 5, 6]), true).unwrap();
        assert_eq!(d.as_collection().unwrap().element_differences.len(), 1);
        assert!(d.element(0).is_some());
    }

    #[test]
    fn poisoned_sequence_aborts_the_comparison() {
        let broken = ints(&[1, 2]);
        let seq = broken.as_seq().unwrap().clone();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            seq.update(|_| panic!("edit failed")).ok();
        }));

        let err = EquivalenceEngine::default()
            .difference(&ints(&[1, 2]), &broken, ComparisonModes::strict())
            .unwrap_err();
        assert_eq!(err, EngineError::Types(TypeError::Poisoned("sequence")));
    }

    #[test]
    fn order_matters() {
        let d = compare(&ints(&[1, 2, 3]), &ints(&[3, 1, 2]), false).unwrap();
        assert_eq!(d.kind(), "collection");
        assert_eq!(d.divergence_count(), 3);
    }
}
