//! Short-circuit rules applied before any comparator runs.

use refeq_types::{ComparisonModes, TypeError, Value};

/// Outcome of the pre-checks for one value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// The pair is equivalent without further inspection.
    Equivalent,
    /// Exactly one side is null.
    OneNull,
    /// Both sides are present; the comparator chain decides.
    Descend,
}

/// Returns `true` if `value` is the unset value of its kind: null, zero,
/// `false`, the NUL character, or an empty sequence or map.
pub fn is_default(value: &Value) -> Result<bool, TypeError> {
    Ok(match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Int(i) => *i == 0,
        Value::Float(f) => *f == 0.0,
        Value::Char(c) => *c == '\0',
        Value::Seq(seq) => seq.is_empty()?,
        Value::Map(map) => map.is_empty()?,
        _ => false,
    })
}

/// Apply identity, default and null rules to an (expected, actual) pair.
///
/// Only the expected side is checked for defaults, so under
/// `ignore_defaults` the relation is deliberately asymmetric.
pub fn evaluate(
    expected: &Value,
    actual: &Value,
    modes: ComparisonModes,
) -> Result<Shortcut, TypeError> {
    if expected.is_same_reference(actual) || (expected.is_null() && actual.is_null()) {
        return Ok(Shortcut::Equivalent);
    }
    if modes.ignore_defaults && is_default(expected)? {
        return Ok(Shortcut::Equivalent);
    }
    if expected.is_null() || actual.is_null() {
        return Ok(Shortcut::OneNull);
    }
    Ok(Shortcut::Descend)
}
