use serde::Serialize;

use refeq_types::Value;

use crate::difference::Difference;
use crate::serialize;

/// Field-by-field divergence between two records, or between two lazy
/// references whose surrogate keys differ. Never empty when produced by
/// the engine.
///
/// Fields appear in discovery order: the record's own fields first, then
/// those of each ancestor type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectDifference {
    pub reason: String,
    #[serde(serialize_with = "serialize::value")]
    pub left: Value,
    #[serde(serialize_with = "serialize::value")]
    pub right: Value,
    #[serde(serialize_with = "serialize::named")]
    pub fields: Vec<(String, Difference)>,
}

impl ObjectDifference {
    pub fn new(reason: impl Into<String>, left: Value, right: Value) -> Self {
        Self {
            reason: reason.into(),
            left,
            right,
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, difference: Difference) {
        self.fields.push((name.into(), difference));
    }

    /// First child recorded under `name`.
    pub fn field(&self, name: &str) -> Option<&Difference> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn divergence_count(&self) -> usize {
        self.fields.iter().map(|(_, d)| d.divergence_count()).sum()
    }
}
