//! Built-in comparators, in chain order.

pub mod atomic;
pub mod dates;
pub mod lazy;
pub mod map;
pub mod ordered;
pub mod structural;
pub mod unordered;

pub use atomic::AtomicComparator;
pub use dates::LenientDatesComparator;
pub use lazy::{LazyReferenceComparator, LazyResolver};
pub use map::MapComparator;
pub use ordered::OrderedCollectionComparator;
pub use structural::StructuralComparator;
pub use unordered::UnorderedCollectionComparator;

use refeq_types::{SeqFlavor, Value};

use crate::comparator::ValuePair;
use crate::error::{EngineError, EngineResult};

/// Returns `true` if both sides are set-flavoured sequences. Their element
/// order is an artifact of the source container, so they are always
/// compared as multisets.
pub(crate) fn both_sets(pair: &ValuePair<'_>) -> bool {
    let is_set = |value: &Value| value.as_seq().is_some_and(|seq| seq.flavor() == SeqFlavor::Set);
    is_set(pair.left) && is_set(pair.right)
}

/// Snapshot of a sequence's elements.
pub(crate) fn seq_items(value: &Value) -> EngineResult<Vec<Value>> {
    match value.as_seq() {
        Some(seq) => Ok(seq.items()?),
        None => Err(EngineError::Introspection(format!(
            "expected a sequence, found {}",
            value.type_name()
        ))),
    }
}

/// Snapshot of a map's entries.
pub(crate) fn map_entries(value: &Value) -> EngineResult<Vec<(Value, Value)>> {
    match value.as_map() {
        Some(map) => Ok(map.entries()?),
        None => Err(EngineError::Introspection(format!(
            "expected a map, found {}",
            value.type_name()
        ))),
    }
}
