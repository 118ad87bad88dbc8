use refeq_diff::{Difference, MapDifference};
use refeq_types::{ComparisonModes, ValueKind};

use crate::comparators::map_entries;
use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::EngineResult;

/// Key-by-key comparison of two maps.
///
/// Keys are matched with a separate strict comparison that ignores the
/// active modes; values under matched keys are compared with them. Keys
/// are matched pairwise rather than hashed since key types need not have a
/// usable native equality.
pub struct MapComparator;

impl Comparator for MapComparator {
    fn name(&self) -> &str {
        "map"
    }

    fn applies(&self, pair: &ValuePair<'_>, _modes: ComparisonModes) -> bool {
        pair.both(ValueKind::Map)
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        let left_entries = map_entries(pair.left)?;
        let right_entries = map_entries(pair.right)?;
        let mut difference =
            MapDifference::new("Different elements", pair.left.clone(), pair.right.clone());
        let mut right_pool: Vec<usize> = (0..right_entries.len()).collect();
        let engine = comparison.engine();

        for (left_key, left_value) in &left_entries {
            let mut matched = None;
            for (pos, &j) in right_pool.iter().enumerate() {
                let right_key = &right_entries[j].0;
                if engine.is_equivalent(left_key, right_key, ComparisonModes::strict())? {
                    matched = Some(pos);
                    break;
                }
            }

            let Some(pos) = matched else {
                difference.add_left_missing_key(left_key.clone());
                if comparison.stop_at_first() {
                    return Ok(Some(difference.into()));
                }
                continue;
            };
            let j = right_pool.remove(pos);
            if let Some(value) = comparison.difference(left_value, &right_entries[j].1)? {
                difference.add_value_difference(left_key.clone(), value);
                if comparison.stop_at_first() {
                    return Ok(Some(difference.into()));
                }
            }
        }

        for j in right_pool {
            difference.add_right_missing_key(right_entries[j].0.clone());
            if comparison.stop_at_first() {
                break;
            }
        }

        if difference.is_empty() {
            return Ok(None);
        }
        Ok(Some(difference.into()))
    }
}
