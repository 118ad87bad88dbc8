use tracing::debug;

use refeq_diff::{BestMatch, Difference, UnorderedCollectionDifference};
use refeq_types::{ComparisonModes, Value, ValueKind};

use crate::comparators::{both_sets, seq_items};
use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::{EngineError, EngineResult};

/// Multiset comparison of two sequences, active under lenient order and
/// for any pair of sets.
///
/// Elements with an exact counterpart are removed first. Each remaining
/// left element, in index order, is then paired with the remaining right
/// element it differs from least (fewest leaf divergences, lowest right
/// index on ties). A right element may be the best match of several left
/// elements. When one side has nothing left, the other side's elements are
/// paired with no counterpart.
pub struct UnorderedCollectionComparator;

impl Comparator for UnorderedCollectionComparator {
    fn name(&self) -> &str {
        "unordered-collection"
    }

    fn applies(&self, pair: &ValuePair<'_>, modes: ComparisonModes) -> bool {
        pair.both(ValueKind::Seq) && (modes.lenient_order || both_sets(pair))
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        let left_items = seq_items(pair.left)?;
        let right_items = seq_items(pair.right)?;

        let (left_pool, right_pool) = eliminate_exact_matches(&left_items, &right_items, comparison)?;
        if left_pool.is_empty() && right_pool.is_empty() {
            return Ok(None);
        }

        if let Some(limit) = comparison.config().max_best_match_pool {
            if left_pool.len() > limit || right_pool.len() > limit {
                return Err(EngineError::PoolTooLarge {
                    left: left_pool.len(),
                    right: right_pool.len(),
                    limit,
                });
            }
        }

        let mut difference = UnorderedCollectionDifference::new(
            "Different elements",
            pair.left.clone(),
            pair.right.clone(),
            left_items.clone(),
            right_items.clone(),
        );

        if right_pool.is_empty() {
            for &i in &left_pool {
                let unmatched = Difference::leaf("No matching element", left_items[i].clone(), Value::Null);
                difference.add_best_match(BestMatch::new(Some(i), None), unmatched);
                if comparison.stop_at_first() {
                    break;
                }
            }
        } else if left_pool.is_empty() {
            for &j in &right_pool {
                let unmatched = Difference::leaf("No matching element", Value::Null, right_items[j].clone());
                difference.add_best_match(BestMatch::new(None, Some(j)), unmatched);
                if comparison.stop_at_first() {
                    break;
                }
            }
        } else {
            for &i in &left_pool {
                let Some((j, element)) =
                    best_match(&left_items[i], &right_items, &right_pool, comparison)?
                else {
                    continue;
                };
                debug!(left = i, right = j, divergences = element.divergence_count(), "best match");
                difference.add_best_match(BestMatch::new(Some(i), Some(j)), element);
                if comparison.stop_at_first() {
                    break;
                }
            }
        }

        difference.left_unmatched = left_pool;
        difference.right_unmatched = right_pool;
        Ok(Some(difference.into()))
    }
}

/// Remove every left element that has an equivalent right element, pairing
/// each with the first such right element still available. Returns the
/// indices left over on each side, in ascending order.
fn eliminate_exact_matches(
    left_items: &[Value],
    right_items: &[Value],
    comparison: &mut Comparison<'_>,
) -> EngineResult<(Vec<usize>, Vec<usize>)> {
    let mut left_pool = Vec::new();
    let mut right_pool: Vec<usize> = (0..right_items.len()).collect();

    for (i, left) in left_items.iter().enumerate() {
        let mut matched = None;
        for (pos, &j) in right_pool.iter().enumerate() {
            if comparison.is_equivalent(left, &right_items[j])? {
                matched = Some(pos);
                break;
            }
        }
        match matched {
            Some(pos) => {
                right_pool.remove(pos);
            }
            None => left_pool.push(i),
        }
    }
    Ok((left_pool, right_pool))
}

/// The right element in `pool` that `left` differs from least, with the
/// full difference to it.
fn best_match(
    left: &Value,
    right_items: &[Value],
    pool: &[usize],
    comparison: &mut Comparison<'_>,
) -> EngineResult<Option<(usize, Difference)>> {
    let mut best: Option<(usize, Difference, usize)> = None;
    for &j in pool {
        let Some(candidate) = comparison.full_difference(left, &right_items[j])? else {
            continue;
        };
        let count = candidate.divergence_count();
        if best.as_ref().map_or(true, |(_, _, lowest)| count < *lowest) {
            best = Some((j, candidate, count));
        }
    }
    Ok(best.map(|(j, difference, _)| (j, difference)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use refeq_types::{ComparisonMode, TypeDescriptor};

    use crate::{EngineConfig, EquivalenceEngine};

    fn lenient_order() -> ComparisonModes {
        ComparisonModes::strict().with(ComparisonMode::LenientOrder)
    }

    fn strings(values: &[&str]) -> Value {
        Value::array(values.iter().map(|s| Value::from(*s)))
    }

    fn compare(left: &Value, right: &Value) -> Option<Difference> {
        EquivalenceEngine::default()
            .difference(left, right, lenient_order())
            .unwrap()
    }

    #[test]
    fn permutations_are_equivalent() {
        assert!(compare(&strings(&["1", "2", "3"]), &strings(&["3", "1", "2"])).is_none());
    }

    #[test]
    fn duplicates_are_counted() {
        let d = compare(&strings(&["a", "a"]), &strings(&["a", "b"])).unwrap();
        let unordered = d.as_unordered().unwrap();
        assert_eq!(unordered.left_unmatched, vec![1]);
        assert_eq!(unordered.right_unmatched, vec![1]);
    }

    #[test]
    fn ties_go_to_the_lowest_right_index() {
        let d = compare(&strings(&["1", "2", "3"]), &strings(&["4", "5", "6"])).unwrap();
        let unordered = d.as_unordered().unwrap();
        assert_eq!(unordered.best_matches.len(), 3);
        for i in 0..3 {
            let (pair, _) = d.best_match_for(i).unwrap();
            assert_eq!(pair, BestMatch::new(Some(i), Some(0)));
        }
    }

    #[test]
    fn only_mismatching_elements_are_matched() {
        let expected = strings(&["1", "2", "3", "4", "17", "18", "19", "20", "22", "23", "50"]);
        let actual = strings(&["1", "3", "4", "2", "17", "18", "19", "20", "21", "22", "23"]);
        let d = compare(&expected, &actual).unwrap();
        let unordered = d.as_unordered().unwrap();
        assert_eq!(unordered.best_matches.len(), 1);
        let (pair, element) = d.best_match_for(10).unwrap();
        assert_eq!(pair.right, Some(8));
        assert_eq!(element.left(), &Value::from("50"));
        assert_eq!(element.right(), &Value::from("21"));
    }

    #[test]
    fn closest_record_wins() {
        let ty = TypeDescriptor::builder("Point").field("x").field("y").build();
        let point = |x: i64, y: i64| {
            Value::record(&ty, [("x", Value::from(x)), ("y", Value::from(y))]).unwrap()
        };
        let expected = Value::list([point(1, 2)]);
        let actual = Value::list([point(9, 9), point(1, 3)]);
        let d = compare(&expected, &actual).unwrap();
        let (pair, element) = d.best_match_for(0).unwrap();
        assert_eq!(pair.right, Some(1));
        assert_eq!(element.divergence_count(), 1);
    }

    #[test]
    fn extra_left_elements_have_no_counterpart() {
        let d = compare(&strings(&["a", "b"]), &strings(&["a"])).unwrap();
        let (pair, element) = d.best_match_for(1).unwrap();
        assert_eq!(pair.indices(), (1, -1));
        assert!(element.right().is_null());
    }

    #[test]
    fn extra_right_elements_have_no_counterpart() {
        let d = compare(&strings(&["a"]), &strings(&["a", "b"])).unwrap();
        let unordered = d.as_unordered().unwrap();
        let (pair, _) = unordered.best_match_for_right(1).unwrap();
        assert_eq!(pair.indices(), (-1, 1));
    }

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::from))
    }

    #[test]
    fn stop_at_first_records_one_best_match() {
        let d = EquivalenceEngine::default()
            .difference_with(&strings(&["1", "2", "3"]), &strings(&["4", "5", "6"]), lenient_order(), true)
            .unwrap()
            .unwrap();
        assert_eq!(d.as_unordered().unwrap().best_matches.len(), 1);
        assert!(d.best_match_for(0).is_some());
    }

    #[test]
    fn stop_at_first_records_one_unmatched_element() {
        let engine = EquivalenceEngine::default();
        let d = engine
            .difference_with(&ints(&[1, 2, 3]), &ints(&[]), lenient_order(), true)
            .unwrap()
            .unwrap();
        assert_eq!(d.as_unordered().unwrap().best_matches.len(), 1);

        let d = engine
            .difference_with(&ints(&[]), &ints(&[1, 2, 3]), lenient_order(), true)
            .unwrap()
            .unwrap();
        assert_eq!(d.as_unordered().unwrap().best_matches.len(), 1);

        let full = engine
            .difference_with(&ints(&[1, 2, 3]), &ints(&[]), lenient_order(), false)
            .unwrap()
            .unwrap();
        assert_eq!(full.as_unordered().unwrap().best_matches.len(), 3);
    }

    #[test]
    fn sets_ignore_order_in_strict_mode() {
        let left = Value::set([Value::from(1), Value::from(2), Value::from(3)]);
        let right = Value::set([Value::from(3), Value::from(1), Value::from(2)]);
        let engine = EquivalenceEngine::default();
        assert!(engine.difference(&left, &right, ComparisonModes::strict()).unwrap().is_none());

        let other = Value::set([Value::from(3), Value::from(1), Value::from(4)]);
        let d = engine.difference(&left, &other, ComparisonModes::strict()).unwrap().unwrap();
        assert_eq!(d.kind(), "unordered");
    }

    #[test]
    fn independently_built_hash_sets_are_equivalent() {
        let engine = EquivalenceEngine::default();
        for _ in 0..20 {
            let a: HashSet<i64> = (0..16).collect();
            let b: HashSet<i64> = (0..16).collect();
            assert!(engine.difference_of(&a, &b, ComparisonModes::strict()).unwrap().is_none());
        }
    }

    #[test]
    fn set_against_list_keeps_order() {
        let set = Value::set([Value::from(1), Value::from(2)]);
        let d = EquivalenceEngine::default()
            .difference(&set, &ints(&[2, 1]), ComparisonModes::strict())
            .unwrap()
            .unwrap();
        assert_eq!(d.kind(), "collection");
    }

    #[test]
    fn pool_limit_is_enforced() {
        let engine = EquivalenceEngine::new(EngineConfig::default().with_max_best_match_pool(2));
        let err = engine
            .difference(&strings(&["1", "2", "3"]), &strings(&["4", "5", "6"]), lenient_order())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::PoolTooLarge {
                left: 3,
                right: 3,
                limit: 2
            }
        );
    }

    #[test]
    fn pool_limit_ignores_exact_matches() {
        let engine = EquivalenceEngine::new(EngineConfig::default().with_max_best_match_pool(1));
        let d = engine
            .difference(&strings(&["1", "2", "3"]), &strings(&["3", "2", "4"]), lenient_order())
            .unwrap();
        assert!(d.is_some());
    }
}
