use std::sync::Arc;

use tracing::{debug, trace};

use refeq_diff::Difference;
use refeq_types::{ComparisonModes, Introspect, Value};

use crate::chain::ComparatorChain;
use crate::comparator::ValuePair;
use crate::comparators::LazyResolver;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::guard::CycleGuard;
use crate::policy::{self, Shortcut};

// ---------------------------------------------------------------------------
// EquivalenceEngine
// ---------------------------------------------------------------------------

/// The structural equivalence engine: a comparator chain plus its
/// configuration.
///
/// The engine is immutable once built and can be shared across threads.
/// Every top-level call creates its own [`Comparison`] with a fresh cycle
/// guard.
pub struct EquivalenceEngine {
    chain: ComparatorChain,
    config: EngineConfig,
}

impl EquivalenceEngine {
    /// An engine with the standard comparator chain.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_chain(ComparatorChain::standard(), config)
    }

    /// An engine with a caller-supplied chain.
    pub fn with_chain(chain: ComparatorChain, config: EngineConfig) -> Self {
        Self { chain, config }
    }

    /// An engine with the standard chain headed by a lazy-reference
    /// comparator for `resolver`.
    pub fn with_resolver(resolver: Arc<dyn LazyResolver>, config: EngineConfig) -> Self {
        Self::with_chain(ComparatorChain::with_resolver(resolver), config)
    }

    /// The current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn chain(&self) -> &ComparatorChain {
        &self.chain
    }

    /// Compare `expected` with `actual` and build the full difference tree.
    ///
    /// Returns `Ok(None)` if the values are equivalent under `modes`.
    pub fn difference(
        &self,
        expected: &Value,
        actual: &Value,
        modes: ComparisonModes,
    ) -> EngineResult<Option<Difference>> {
        self.difference_with(expected, actual, modes, false)
    }

    /// Compare using the configured default modes.
    pub fn difference_default(
        &self,
        expected: &Value,
        actual: &Value,
    ) -> EngineResult<Option<Difference>> {
        self.difference(expected, actual, self.config.modes)
    }

    /// Compare `expected` with `actual`.
    ///
    /// With `stop_at_first`, every comparator returns as soon as it has found
    /// one child divergence, so the tree holds a single path.
    pub fn difference_with(
        &self,
        expected: &Value,
        actual: &Value,
        modes: ComparisonModes,
        stop_at_first: bool,
    ) -> EngineResult<Option<Difference>> {
        debug!(%modes, stop_at_first, "comparison started");
        let mut comparison = Comparison::new(self, modes, stop_at_first);
        let result = comparison.difference(expected, actual)?;
        debug!(
            equivalent = result.is_none(),
            divergences = result.as_ref().map_or(0, Difference::divergence_count),
            "comparison finished"
        );
        Ok(result)
    }

    /// Returns `true` if `expected` and `actual` are equivalent under
    /// `modes`. Stops at the first divergence.
    pub fn is_equivalent(
        &self,
        expected: &Value,
        actual: &Value,
        modes: ComparisonModes,
    ) -> EngineResult<bool> {
        Ok(self
            .difference_with(expected, actual, modes, true)?
            .is_none())
    }

    /// Introspect two host values and compare them.
    pub fn difference_of<T: Introspect + ?Sized>(
        &self,
        expected: &T,
        actual: &T,
        modes: ComparisonModes,
    ) -> EngineResult<Option<Difference>> {
        self.difference(&expected.introspect(), &actual.introspect(), modes)
    }
}

impl Default for EquivalenceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// State of one top-level comparison: the engine, the fixed mode set, the
/// stop flag and the cycle guard.
///
/// Comparators receive the comparison and call [`Comparison::difference`]
/// to recurse into nested values.
pub struct Comparison<'e> {
    engine: &'e EquivalenceEngine,
    modes: ComparisonModes,
    stop_at_first: bool,
    guard: CycleGuard,
}

impl<'e> Comparison<'e> {
    fn new(engine: &'e EquivalenceEngine, modes: ComparisonModes, stop_at_first: bool) -> Self {
        Self {
            engine,
            modes,
            stop_at_first,
            guard: CycleGuard::new(),
        }
    }

    pub fn modes(&self) -> ComparisonModes {
        self.modes
    }

    pub fn stop_at_first(&self) -> bool {
        self.stop_at_first
    }

    pub fn config(&self) -> &EngineConfig {
        &self.engine.config
    }

    /// The engine this comparison runs on, for nested independent calls.
    pub fn engine(&self) -> &'e EquivalenceEngine {
        self.engine
    }

    /// Recursive entry point: compare a nested value pair under this
    /// comparison's modes, stop flag and cycle guard.
    pub fn difference(&mut self, left: &Value, right: &Value) -> EngineResult<Option<Difference>> {
        let pair = ValuePair::new(left, right);
        let engine = self.engine;

        match policy::evaluate(left, right, self.modes)? {
            Shortcut::Equivalent => return Ok(None),
            Shortcut::OneNull => {
                // Comparators that understand absence (lenient dates, lazy
                // references) may still claim the pair.
                return match engine.chain.select(&pair, self.modes) {
                    Some(comparator) => comparator.compare(&pair, self),
                    None => Ok(Some(pair.leaf("Different values"))),
                };
            }
            Shortcut::Descend => {}
        }

        let identities = left.identity().zip(right.identity());
        if let Some(ids) = identities {
            if !self.guard.enter(ids) {
                trace!(left = ids.0, right = ids.1, "pair already in flight");
                return Ok(None);
            }
        }

        let result = match engine.chain.select(&pair, self.modes) {
            Some(comparator) => {
                trace!(comparator = comparator.name(), "comparator selected");
                comparator.compare(&pair, self)
            }
            None => Ok(Some(Difference::class(left.clone(), right.clone()))),
        };

        if let Some(ids) = identities {
            self.guard.exit(ids);
        }
        result
    }

    /// Compare a nested pair and always build the complete subtree,
    /// regardless of the stop flag.
    pub fn full_difference(
        &mut self,
        left: &Value,
        right: &Value,
    ) -> EngineResult<Option<Difference>> {
        self.with_stop_flag(false, |cx| cx.difference(left, right))
    }

    /// Returns `true` if a nested pair is equivalent, stopping at the first
    /// divergence.
    pub fn is_equivalent(&mut self, left: &Value, right: &Value) -> EngineResult<bool> {
        Ok(self
            .with_stop_flag(true, |cx| cx.difference(left, right))?
            .is_none())
    }

    fn with_stop_flag<T>(
        &mut self,
        stop_at_first: bool,
        f: impl FnOnce(&mut Self) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let saved = std::mem::replace(&mut self.stop_at_first, stop_at_first);
        let result = f(self);
        self.stop_at_first = saved;
        result
    }
}
