use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// How a declared field participates in structural comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAttr {
    /// Regular per-instance state. The only kind that is compared.
    Instance,
    /// Per-instance state excluded from persistence and comparison.
    Transient,
    /// Type-level state shared by all instances.
    Static,
    /// Generated by tooling rather than declared by the author.
    Synthetic,
}

/// A field declared by a [`TypeDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub attr: FieldAttr,
}

impl FieldDescriptor {
    /// A regular instance field.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attr(name, FieldAttr::Instance)
    }

    pub fn with_attr(name: impl Into<String>, attr: FieldAttr) -> Self {
        Self {
            name: name.into(),
            attr,
        }
    }

    /// Returns `true` if the structural comparator should look at this field.
    pub fn is_compared(&self) -> bool {
        self.attr == FieldAttr::Instance
    }
}

/// One storage slot in the flattened layout of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSlot {
    /// Name of the type that declares the field.
    pub owner: String,
    /// The declared field.
    pub field: FieldDescriptor,
    /// Whether the declaring type is a base-library type.
    pub builtin_owner: bool,
}

/// Runtime description of a record type: its name, its parent type and the
/// fields it declares.
///
/// Descriptors form single-inheritance chains. The flattened slot layout
/// lists the type's own fields first and then those of each ancestor, which
/// is also the order in which fields are compared.
pub struct TypeDescriptor {
    name: String,
    parent: Option<Arc<TypeDescriptor>>,
    fields: Vec<FieldDescriptor>,
    builtin: bool,
    layout: Vec<FieldSlot>,
}

impl TypeDescriptor {
    /// Start describing a user type.
    pub fn builder(name: impl Into<String>) -> TypeBuilder {
        TypeBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            builtin: false,
        }
    }

    /// A base-library type. Its fields (and those of its ancestors) are
    /// never enumerated by the structural comparator.
    pub fn builtin(name: impl Into<String>) -> Arc<Self> {
        Self::builder(name).builtin().build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref()
    }

    /// Fields declared directly on this type, in declaration order.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// This type followed by each of its ancestors.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.parent.as_deref())
    }

    /// Returns `true` if a value of type `other` may stand where this type
    /// is expected, i.e. `other` is this type or one of its descendants.
    pub fn is_assignable_from(&self, other: &TypeDescriptor) -> bool {
        other
            .ancestry()
            .any(|t| std::ptr::eq(t, self) || t.name == self.name)
    }

    /// Every storage slot, own fields first.
    pub fn layout(&self) -> &[FieldSlot] {
        &self.layout
    }

    /// Indices of the slots that take part in comparison: instance fields of
    /// this type and its non-builtin ancestors.
    pub fn compared_slots(&self) -> impl Iterator<Item = (usize, &FieldSlot)> {
        self.layout
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.builtin_owner && slot.field.is_compared())
    }

    /// Slot of the most-derived field called `name`.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.layout.iter().position(|slot| slot.field.name == name)
    }

    /// Slot of the field `name` declared by the type called `owner`.
    pub fn declared_slot(&self, owner: &str, name: &str) -> Option<usize> {
        self.layout
            .iter()
            .position(|slot| slot.owner == owner && slot.field.name == name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeBuilder {
    name: String,
    parent: Option<Arc<TypeDescriptor>>,
    fields: Vec<FieldDescriptor>,
    builtin: bool,
}

impl TypeBuilder {
    /// Mark the type as part of the base library.
    pub fn builtin(mut self) -> Self {
        self.builtin = true;
        self
    }

    pub fn extends(mut self, parent: &Arc<TypeDescriptor>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor::new(name));
        self
    }

    pub fn transient_field(mut self, name: impl Into<String>) -> Self {
        self.fields
            .push(FieldDescriptor::with_attr(name, FieldAttr::Transient));
        self
    }

    pub fn static_field(mut self, name: impl Into<String>) -> Self {
        self.fields
            .push(FieldDescriptor::with_attr(name, FieldAttr::Static));
        self
    }

    pub fn synthetic_field(mut self, name: impl Into<String>) -> Self {
        self.fields
            .push(FieldDescriptor::with_attr(name, FieldAttr::Synthetic));
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor> {
        let mut layout: Vec<FieldSlot> = self
            .fields
            .iter()
            .map(|field| FieldSlot {
                owner: self.name.clone(),
                field: field.clone(),
                builtin_owner: self.builtin,
            })
            .collect();

        // Once a builtin type appears in the chain, everything above it is
        // base library as well.
        if let Some(parent) = &self.parent {
            let force_builtin = self.builtin;
            layout.extend(parent.layout.iter().map(|slot| FieldSlot {
                builtin_owner: slot.builtin_owner || force_builtin,
                ..slot.clone()
            }));
        }

        Arc::new(TypeDescriptor {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            builtin: self.builtin,
            layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (Arc<TypeDescriptor>, Arc<TypeDescriptor>, Arc<TypeDescriptor>) {
        let object = TypeDescriptor::builder("lang.Object")
            .builtin()
            .field("monitor")
            .build();
        let base = TypeDescriptor::builder("Base")
            .extends(&object)
            .field("id")
            .transient_field("cache")
            .build();
        let derived = TypeDescriptor::builder("Derived")
            .extends(&base)
            .field("name")
            .static_field("COUNT")
            .build();
        (object, base, derived)
    }

    #[test]
    fn layout_lists_own_fields_first() {
        let (_, _, derived) = hierarchy();
        let names: Vec<_> = derived
            .layout()
            .iter()
            .map(|s| s.field.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "COUNT", "id", "cache", "monitor"]);
    }

    #[test]
    fn compared_slots_skip_non_instance_and_builtin() {
        let (_, _, derived) = hierarchy();
        let names: Vec<_> = derived
            .compared_slots()
            .map(|(_, s)| s.field.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "id"]);
    }

    #[test]
    fn assignability_follows_ancestry() {
        let (object, base, derived) = hierarchy();
        assert!(base.is_assignable_from(&derived));
        assert!(object.is_assignable_from(&derived));
        assert!(!derived.is_assignable_from(&base));
        assert!(base.is_assignable_from(&base));
    }

    #[test]
    fn unrelated_types_are_not_assignable() {
        let a = TypeDescriptor::builder("A").field("x").build();
        let b = TypeDescriptor::builder("B").field("x").build();
        assert!(!a.is_assignable_from(&b));
    }

    #[test]
    fn declared_slot_distinguishes_owners() {
        let base = TypeDescriptor::builder("Base").field("value").build();
        let shadow = TypeDescriptor::builder("Shadow")
            .extends(&base)
            .field("value")
            .build();
        assert_eq!(shadow.slot_of("value"), Some(0));
        assert_eq!(shadow.declared_slot("Base", "value"), Some(1));
        assert_eq!(shadow.declared_slot("Other", "value"), None);
    }

    #[test]
    fn builtin_constructor_marks_every_slot() {
        let lang = TypeDescriptor::builtin("lang.Number");
        let boxed = TypeDescriptor::builder("Boxed")
            .extends(&lang)
            .field("inner")
            .build();
        assert!(lang.is_builtin());
        assert_eq!(boxed.compared_slots().count(), 1);
    }
}
