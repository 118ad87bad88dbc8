use std::sync::Arc;

use refeq_types::ComparisonModes;

use crate::comparator::{Comparator, ValuePair};
use crate::comparators::{
    AtomicComparator, LazyReferenceComparator, LazyResolver, LenientDatesComparator,
    MapComparator, OrderedCollectionComparator, StructuralComparator,
    UnorderedCollectionComparator,
};

/// Ordered list of comparators. The first one that applies to a pair wins.
///
/// The chain holds no per-comparison state and can be shared by any number
/// of concurrent comparisons.
pub struct ComparatorChain {
    comparators: Vec<Box<dyn Comparator>>,
}

impl ComparatorChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self {
            comparators: Vec::new(),
        }
    }

    /// The built-in chain:
    /// LenientDates -> Atomic -> OrderedCollection -> UnorderedCollection -> Map -> Structural
    pub fn standard() -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(LenientDatesComparator));
        chain.push(Box::new(AtomicComparator));
        chain.push(Box::new(OrderedCollectionComparator));
        chain.push(Box::new(UnorderedCollectionComparator));
        chain.push(Box::new(MapComparator));
        chain.push(Box::new(StructuralComparator));
        chain
    }

    /// The built-in chain headed by a lazy-reference comparator for
    /// `resolver`.
    pub fn with_resolver(resolver: Arc<dyn LazyResolver>) -> Self {
        let mut chain = Self::standard();
        chain.prepend(Box::new(LazyReferenceComparator::new(resolver)));
        chain
    }

    /// Append a comparator to the end of the chain.
    pub fn push(&mut self, comparator: Box<dyn Comparator>) {
        self.comparators.push(comparator);
    }

    /// Insert a comparator at the head of the chain.
    pub fn prepend(&mut self, comparator: Box<dyn Comparator>) {
        self.comparators.insert(0, comparator);
    }

    /// Number of comparators in the chain.
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Comparator names in chain order.
    pub fn names(&self) -> Vec<&str> {
        self.comparators.iter().map(|c| c.name()).collect()
    }

    /// The first comparator that applies to `pair`.
    pub fn select(&self, pair: &ValuePair<'_>, modes: ComparisonModes) -> Option<&dyn Comparator> {
        self.comparators
            .iter()
            .find(|c| c.applies(pair, modes))
            .map(|c| &**c)
    }
}

impl Default for ComparatorChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refeq_types::{ComparisonMode, Value};

    #[test]
    fn standard_order() {
        let chain = ComparatorChain::standard();
        assert_eq!(
            chain.names(),
            vec![
                "lenient-dates",
                "atomic",
                "ordered-collection",
                "unordered-collection",
                "map",
                "structural"
            ]
        );
    }

    #[test]
    fn order_mode_selects_collection_strategy() {
        let chain = ComparatorChain::standard();
        let (a, b) = (Value::list([]), Value::array([]));
        let pair = ValuePair::new(&a, &b);

        let strict = chain.select(&pair, ComparisonModes::strict()).unwrap();
        assert_eq!(strict.name(), "ordered-collection");

        let lenient = ComparisonModes::strict().with(ComparisonMode::LenientOrder);
        let selected = chain.select(&pair, lenient).unwrap();
        assert_eq!(selected.name(), "unordered-collection");
    }

    #[test]
    fn structural_is_the_fallback() {
        let chain = ComparatorChain::standard();
        let (a, b) = (Value::list([]), Value::map([]));
        let pair = ValuePair::new(&a, &b);
        let selected = chain.select(&pair, ComparisonModes::strict()).unwrap();
        assert_eq!(selected.name(), "structural");
    }

    #[test]
    fn nothing_applies_to_one_null_by_default() {
        let chain = ComparatorChain::standard();
        let (a, b) = (Value::from("x"), Value::Null);
        let pair = ValuePair::new(&a, &b);
        assert!(chain.select(&pair, ComparisonModes::strict()).is_none());
    }

    #[test]
    fn empty_chain() {
        let chain = ComparatorChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }
}
