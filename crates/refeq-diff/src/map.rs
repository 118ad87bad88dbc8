use serde::Serialize;

use refeq_types::Value;

use crate::difference::Difference;
use crate::serialize;

/// Divergence between two maps.
///
/// Keys are matched structurally. `value_differences` holds the matched keys
/// whose values differ (keyed by the left key); keys found on only one side
/// are listed separately and never appear as value differences.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
    #[serde(serialize_with = "serialize::keyed")]
    pub value_differences: Vec<(Value, Difference)>,
    #[serde(serialize_with = "serialize::values")]
    pub left_missing_keys: Vec<Value>,
    #[serde(serialize_with = "serialize::values")]
    pub right_missing_keys: Vec<Value>,
}

impl MapDifference {
    pub fn new(reason: impl Into<String>, left: Value, right: Value) -> Self {
        Self {
            reason: reason.into(),
            left,
            right,
            value_differences: Vec::new(),
            left_missing_keys: Vec::new(),
            right_missing_keys: Vec::new(),
        }
    }

    pub fn add_value_difference(&mut self, key: Value, difference: Difference) {
        self.value_differences.push((key, difference));
    }

    /// Record a key that exists in the left map only.
    pub fn add_left_missing_key(&mut self, key: Value) {
        self.left_missing_keys.push(key);
    }

    /// Record a key that exists in the right map only.
    pub fn add_right_missing_key(&mut self, key: Value) {
        self.right_missing_keys.push(key);
    }

    /// Value difference recorded for `key`. Keys are looked up with shallow
    /// equality: atomic keys by value, handle keys by identity.
    pub fn value_difference(&self, key: &Value) -> Option<&Difference> {
        self.value_differences
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d)
    }

    pub fn is_empty(&self) -> bool {
        self.value_differences.is_empty()
            && self.left_missing_keys.is_empty()
            && self.right_missing_keys.is_empty()
    }

    pub fn divergence_count(&self) -> usize {
        let values: usize = self
            .value_differences
            .iter()
            .map(|(_, d)| d.divergence_count())
            .sum();
        values + self.left_missing_keys.len() + self.right_missing_keys.len()
    }
}
