//! Value model for refeq.
//!
//! This crate provides the graph representation that the equivalence engine
//! walks: shared, possibly cyclic value handles, the runtime type
//! descriptors that drive field-by-field comparison, temporal values and the
//! set of comparison modes. Every other refeq crate depends on `refeq-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- A node in a value graph (atomic value or shared handle)
//! - [`TypeDescriptor`] -- Record type with single inheritance and field attributes
//! - [`SeqRef`] / [`MapRef`] / [`StructRef`] / [`OpaqueRef`] -- Shared handles with identity
//! - [`Temporal`] -- Date and time values
//! - [`ComparisonModes`] -- Leniency switches for one comparison
//! - [`Introspect`] -- Conversion of host data into [`Value`]

pub mod collection;
pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod modes;
pub mod opaque;
pub mod record;
pub mod temporal;
pub mod value;

pub use collection::{MapRef, MapValue, SeqFlavor, SeqRef, SeqValue};
pub use descriptor::{FieldAttr, FieldDescriptor, FieldSlot, TypeBuilder, TypeDescriptor};
pub use error::TypeError;
pub use introspect::Introspect;
pub use modes::{ComparisonMode, ComparisonModes};
pub use opaque::{OpaqueRef, OpaqueValue};
pub use record::{StructRef, StructValue};
pub use temporal::{Temporal, TemporalKind};
pub use value::{EnumTag, Value, ValueKind};
