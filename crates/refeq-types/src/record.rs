use std::ops::Deref;
use std::sync::{Arc, RwLock};

use crate::descriptor::TypeDescriptor;
use crate::error::TypeError;
use crate::value::{read_lock, write_lock, Value};

/// Contents of a record handle: one value slot per entry in the type's
/// flattened layout.
pub struct StructValue {
    ty: Arc<TypeDescriptor>,
    slots: RwLock<Vec<Value>>,
}

impl StructValue {
    pub fn type_descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.ty
    }

    /// Read the most-derived field called `name`.
    pub fn get(&self, name: &str) -> Result<Value, TypeError> {
        let index = self.slot_of(name)?;
        let slots = read_lock(&self.slots, "record")?;
        Ok(slots.get(index).cloned().unwrap_or(Value::Null))
    }

    /// Write the most-derived field called `name`.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), TypeError> {
        let index = self.slot_of(name)?;
        let mut slots = write_lock(&self.slots, "record")?;
        if let Some(slot) = slots.get_mut(index) {
            *slot = value.into();
        }
        Ok(())
    }

    /// Read the field `name` declared by type `owner`, or `None` if this
    /// record's type has no such field.
    pub fn get_declared(&self, owner: &str, name: &str) -> Result<Option<Value>, TypeError> {
        let Some(index) = self.ty.declared_slot(owner, name) else {
            return Ok(None);
        };
        let slots = read_lock(&self.slots, "record")?;
        Ok(slots.get(index).cloned())
    }

    /// Write the field `name` declared by type `owner`, which may be an
    /// ancestor field hidden by a same-named field of a subtype.
    pub fn set_declared(
        &self,
        owner: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), TypeError> {
        let index = self.ty.declared_slot(owner, name).ok_or_else(|| TypeError::UnknownField {
            type_name: owner.to_string(),
            field: name.to_string(),
        })?;
        let mut slots = write_lock(&self.slots, "record")?;
        if let Some(slot) = slots.get_mut(index) {
            *slot = value.into();
        }
        Ok(())
    }

    /// The comparable fields as `(name, value)` pairs: own instance fields
    /// first, then those of each non-builtin ancestor.
    pub fn fields(&self) -> Result<Vec<(String, Value)>, TypeError> {
        let slots = read_lock(&self.slots, "record")?;
        Ok(self
            .ty
            .compared_slots()
            .map(|(index, slot)| {
                let value = slots.get(index).cloned().unwrap_or(Value::Null);
                (slot.field.name.clone(), value)
            })
            .collect())
    }

    fn slot_of(&self, name: &str) -> Result<usize, TypeError> {
        self.ty.slot_of(name).ok_or_else(|| TypeError::UnknownField {
            type_name: self.ty.name().to_string(),
            field: name.to_string(),
        })
    }
}

/// Shared handle to a record.
#[derive(Clone)]
pub struct StructRef(Arc<StructValue>);

impl StructRef {
    /// A fresh record of type `ty` with every field null.
    pub fn new(ty: &Arc<TypeDescriptor>) -> Self {
        let slots = vec![Value::Null; ty.layout().len()];
        Self(Arc::new(StructValue {
            ty: Arc::clone(ty),
            slots: RwLock::new(slots),
        }))
    }

    /// Builder-style [`StructValue::set`].
    pub fn with(self, name: &str, value: impl Into<Value>) -> Result<Self, TypeError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Deref for StructRef {
    type Target = StructValue;

    fn deref(&self) -> &StructValue {
        &self.0
    }
}

impl From<StructRef> for Value {
    fn from(record: StructRef) -> Self {
        Value::Struct(record)
    }
}
