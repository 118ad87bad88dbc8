//! Structural equivalence engine for refeq.
//!
//! The engine decides whether two value graphs are equivalent under a set of
//! leniency modes and, if not, builds a [`Difference`](refeq_diff::Difference)
//! tree describing every divergence. Each pair of values goes through the
//! identity/default/null pre-checks, the cycle guard and then the first
//! applicable comparator in the chain:
//!
//! lazy reference (optional) -> lenient dates -> atomic -> ordered collection
//! -> unordered collection -> map -> structural
//!
//! # Quick Start
//!
//! ```rust
//! use refeq_engine::EquivalenceEngine;
//! use refeq_types::{ComparisonMode, ComparisonModes, Value};
//!
//! let engine = EquivalenceEngine::default();
//! let expected = Value::list([Value::from(1), Value::from(2), Value::from(3)]);
//! let actual = Value::list([Value::from(3), Value::from(1), Value::from(2)]);
//!
//! let strict = engine.difference(&expected, &actual, ComparisonModes::strict()).unwrap();
//! assert!(strict.is_some());
//!
//! let lenient = ComparisonModes::strict().with(ComparisonMode::LenientOrder);
//! assert!(engine.is_equivalent(&expected, &actual, lenient).unwrap());
//! ```

pub mod chain;
pub mod comparator;
pub mod comparators;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod policy;

// Re-exports for convenience.
pub use chain::ComparatorChain;
pub use comparator::{Comparator, ValuePair};
pub use comparators::{
    AtomicComparator, LazyReferenceComparator, LazyResolver, LenientDatesComparator,
    MapComparator, OrderedCollectionComparator, StructuralComparator,
    UnorderedCollectionComparator,
};
pub use config::EngineConfig;
pub use engine::{Comparison, EquivalenceEngine};
pub use error::{EngineError, EngineResult};
pub use guard::CycleGuard;
