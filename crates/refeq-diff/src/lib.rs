//! Difference tree for refeq.
//!
//! A comparison that finds a divergence returns a [`Difference`]: a tagged
//! tree whose nodes record what diverged, why, and the two values involved.
//! Equivalence is represented by the absence of a tree, so every node is an
//! actual divergence.
//!
//! # Key Types
//!
//! - [`Difference`] -- Root enum over all node kinds
//! - [`LeafDifference`] / [`ClassDifference`] -- Terminal divergences
//! - [`ObjectDifference`] -- Field-by-field divergence between records
//! - [`MapDifference`] -- Value differences and missing keys between maps
//! - [`CollectionDifference`] -- Index-by-index divergence between sequences
//! - [`UnorderedCollectionDifference`] / [`BestMatch`] -- Best-match pairing of unordered elements

pub mod collection;
pub mod difference;
pub mod map;
pub mod object;
pub mod serialize;

pub use collection::{BestMatch, CollectionDifference, UnorderedCollectionDifference};
pub use difference::{ClassDifference, Difference, LeafDifference};
pub use map::MapDifference;
pub use object::ObjectDifference;
pub use serialize::PREVIEW_DEPTH;
