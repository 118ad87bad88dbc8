use serde::{Deserialize, Serialize};

use refeq_types::ComparisonModes;

/// Configuration for an [`EquivalenceEngine`](crate::EquivalenceEngine).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Modes used by [`difference_default`](crate::EquivalenceEngine::difference_default).
    pub modes: ComparisonModes,
    /// Upper bound on the number of elements left on either side of an
    /// unordered comparison after exact matches are removed. Best matching
    /// is quadratic in this number. `None` means unbounded.
    pub max_best_match_pool: Option<usize>,
}

impl EngineConfig {
    /// Configuration whose default modes are lenient order plus ignored
    /// defaults.
    pub fn lenient() -> Self {
        Self {
            modes: ComparisonModes::lenient(),
            ..Default::default()
        }
    }

    /// Set the best-match pool limit.
    #[must_use]
    pub fn with_max_best_match_pool(mut self, limit: usize) -> Self {
        self.max_best_match_pool = Some(limit);
        self
    }
}
