use refeq_diff::{Difference, ObjectDifference};
use refeq_types::{ComparisonModes, StructRef, Value};

use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::{EngineError, EngineResult};

/// Fallback for any pair of present values no other comparator claimed.
///
/// Records are compared field by field through their type descriptors:
/// the left record's own instance fields, then those of each ancestor up to
/// the first builtin type. A record type's own notion of equality is never
/// consulted. Any other combination of kinds is a class difference.
pub struct StructuralComparator;

impl Comparator for StructuralComparator {
    fn name(&self) -> &str {
        "structural"
    }

    fn applies(&self, pair: &ValuePair<'_>, _modes: ComparisonModes) -> bool {
        pair.both_present()
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        match (pair.left, pair.right) {
            (Value::Struct(left), Value::Struct(right)) => {
                compare_records(pair, left, right, comparison)
            }
            // Distinct handles of a type the engine cannot look inside.
            (Value::Opaque(left), Value::Opaque(right))
                if left.type_name() == right.type_name() =>
            {
                Ok(Some(pair.leaf("Different values")))
            }
            _ => Ok(Some(Difference::class(
                pair.left.clone(),
                pair.right.clone(),
            ))),
        }
    }
}

fn compare_records(
    pair: &ValuePair<'_>,
    left: &StructRef,
    right: &StructRef,
    comparison: &mut Comparison<'_>,
) -> EngineResult<Option<Difference>> {
    let ty = left.type_descriptor();
    if !ty.is_assignable_from(right.type_descriptor()) {
        return Ok(Some(Difference::class(
            pair.left.clone(),
            pair.right.clone(),
        )));
    }

    let mut difference =
        ObjectDifference::new("Different field values", pair.left.clone(), pair.right.clone());
    let left_fields = left.fields()?;

    for ((index, slot), (name, left_value)) in ty.compared_slots().zip(left_fields) {
        let right_value = right
            .get_declared(&slot.owner, &name)?
            .ok_or_else(|| {
                EngineError::Introspection(format!(
                    "type `{}` has no field `{}` declared by `{}`",
                    right.type_descriptor().name(),
                    name,
                    slot.owner
                ))
            })?;
        if let Some(field) = comparison.difference(&left_value, &right_value)? {
            // An ancestor field hidden by a same-named subtype field is
            // keyed by its declaring type.
            let key = if ty.slot_of(&name) == Some(index) {
                name
            } else {
                format!("{}.{}", slot.owner, name)
            };
            difference.add_field(key, field);
            if comparison.stop_at_first() {
                break;
            }
        }
    }

    if difference.is_empty() {
        return Ok(None);
    }
    Ok(Some(difference.into()))
}
