use refeq_diff::Difference;
use refeq_types::{ComparisonModes, Value, ValueKind};

use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::EngineResult;

/// Native equality for scalar values: booleans, numbers, characters,
/// strings, enum tags and temporal values.
///
/// Applies whenever at least one present side is a scalar, so a scalar
/// compared with a container is a plain value mismatch. Numbers and
/// characters compare by numeric value and NaN equals NaN. An integer and
/// a float are equal only when the float is integral and exactly the same
/// integer.
pub struct AtomicComparator;

fn is_scalar(kind: ValueKind) -> bool {
    kind.is_atomic() || kind == ValueKind::Temporal
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Char(c) => Some(f64::from(u32::from(*c))),
        other => other.as_f64(),
    }
}

// 2^63 as a float; every integral float in [-2^63, 2^63) fits an i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer with a float, without rounding the
/// integer to the nearest representable float.
fn int_equals_float(i: i64, f: f64) -> bool {
    f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) && f as i64 == i
}

impl Comparator for AtomicComparator {
    fn name(&self) -> &str {
        "atomic"
    }

    fn applies(&self, pair: &ValuePair<'_>, _modes: ComparisonModes) -> bool {
        pair.both_present() && (is_scalar(pair.left_kind) || is_scalar(pair.right_kind))
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        _comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        let equal = match (pair.left, pair.right) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                if int_equals_float(*i, *f) {
                    return Ok(None);
                }
                return Ok(Some(pair.leaf("Different primitive values")));
            }
            (left, right) => match (numeric(left), numeric(right)) {
                (Some(a), Some(b)) => {
                    if a == b || (a.is_nan() && b.is_nan()) {
                        return Ok(None);
                    }
                    return Ok(Some(pair.leaf("Different primitive values")));
                }
                _ => left == right,
            },
        };
        if equal {
            Ok(None)
        } else {
            Ok(Some(pair.leaf("Different values")))
        }
    }
}
