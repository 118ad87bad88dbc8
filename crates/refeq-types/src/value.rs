use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::collection::{MapRef, SeqFlavor, SeqRef};
use crate::descriptor::TypeDescriptor;
use crate::error::TypeError;
use crate::opaque::OpaqueRef;
use crate::record::StructRef;
use crate::temporal::Temporal;

/// Maximum number of children shown per container in a preview.
const PREVIEW_WIDTH: usize = 8;

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    what: &'static str,
) -> Result<RwLockReadGuard<'a, T>, TypeError> {
    lock.read().map_err(|_| TypeError::Poisoned(what))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    what: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, TypeError> {
    lock.write().map_err(|_| TypeError::Poisoned(what))
}

/// Coarse classification of a [`Value`], resolved once per compared pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    Char,
    Str,
    Enum,
    Temporal,
    Seq,
    Map,
    Struct,
    Opaque,
}

impl ValueKind {
    /// Kinds compared with native equality.
    pub fn is_atomic(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Number | Self::Char | Self::Str | Self::Enum
        )
    }

    /// Kinds backed by a shared handle with a stable identity.
    pub fn is_handle(self) -> bool {
        matches!(self, Self::Seq | Self::Map | Self::Struct | Self::Opaque)
    }
}

/// A tag-only enumerated value, such as a unit enum variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumTag {
    pub type_name: Arc<str>,
    pub variant: Arc<str>,
}

/// A node in a value graph.
///
/// Atomic variants are held inline. `Seq`, `Map`, `Struct` and `Opaque` are
/// shared handles: cloning one yields the same reference, and since their
/// contents are behind interior locks a graph may contain cycles.
///
/// `PartialEq` is shallow: atomic values compare by value, handles compare
/// by identity. Structural comparison is the engine's job.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(Arc<str>),
    Enum(EnumTag),
    Temporal(Temporal),
    Seq(SeqRef),
    Map(MapRef),
    Struct(StructRef),
    Opaque(OpaqueRef),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) | Self::Float(_) => ValueKind::Number,
            Self::Char(_) => ValueKind::Char,
            Self::Str(_) => ValueKind::Str,
            Self::Enum(_) => ValueKind::Enum,
            Self::Temporal(_) => ValueKind::Temporal,
            Self::Seq(_) => ValueKind::Seq,
            Self::Map(_) => ValueKind::Map,
            Self::Struct(_) => ValueKind::Struct,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Address of the shared handle, if this value is one.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Seq(s) => Some(s.addr()),
            Self::Map(m) => Some(m.addr()),
            Self::Struct(s) => Some(s.addr()),
            Self::Opaque(o) => Some(o.addr()),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same shared handle.
    pub fn is_same_reference(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Name of the value's runtime type, for reporting.
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool(_) => "bool".into(),
            Self::Int(_) => "i64".into(),
            Self::Float(_) => "f64".into(),
            Self::Char(_) => "char".into(),
            Self::Str(_) => "string".into(),
            Self::Enum(tag) => tag.type_name.to_string(),
            Self::Temporal(t) => format!("{:?}", t.kind()),
            Self::Seq(s) => s.flavor().as_str().into(),
            Self::Map(_) => "map".into(),
            Self::Struct(s) => s.type_descriptor().name().into(),
            Self::Opaque(o) => o.type_name().into(),
        }
    }

    // -- constructors -------------------------------------------------------

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::Str(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(SeqRef::new(SeqFlavor::List, items))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(SeqRef::new(SeqFlavor::Array, items))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(SeqRef::new(SeqFlavor::Set, items))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(MapRef::new(entries))
    }

    pub fn enum_tag(type_name: impl Into<Arc<str>>, variant: impl Into<Arc<str>>) -> Self {
        Self::Enum(EnumTag {
            type_name: type_name.into(),
            variant: variant.into(),
        })
    }

    /// A record of type `ty` with the given fields set; unset fields are null.
    pub fn record<'a>(
        ty: &Arc<TypeDescriptor>,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Self, TypeError> {
        let record = StructRef::new(ty);
        for (name, value) in fields {
            record.set(name, value)?;
        }
        Ok(Self::Struct(record))
    }

    // -- accessors ----------------------------------------------------------

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            Self::Temporal(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&SeqRef> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructRef> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueRef> {
        match self {
            Self::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Short human-readable rendering that descends at most `depth` levels
    /// into containers, so it terminates on cyclic graphs.
    pub fn preview(&self, depth: usize) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(x) => format!("{x:?}"),
            Self::Char(c) => format!("{c:?}"),
            Self::Str(s) => format!("{s:?}"),
            Self::Enum(tag) => format!("{}::{}", tag.type_name, tag.variant),
            Self::Temporal(t) => t.to_string(),
            Self::Seq(seq) => {
                if depth == 0 {
                    return "[..]".into();
                }
                match seq.items() {
                    Ok(items) => format!("[{}]", preview_list(&items, depth - 1)),
                    Err(_) => "[<poisoned>]".into(),
                }
            }
            Self::Map(map) => {
                if depth == 0 {
                    return "{..}".into();
                }
                match map.entries() {
                    Ok(entries) => {
                        let mut parts: Vec<String> = entries
                            .iter()
                            .take(PREVIEW_WIDTH)
                            .map(|(k, v)| {
                                format!("{}: {}", k.preview(depth - 1), v.preview(depth - 1))
                            })
                            .collect();
                        if entries.len() > PREVIEW_WIDTH {
                            parts.push("..".into());
                        }
                        format!("{{{}}}", parts.join(", "))
                    }
                    Err(_) => "{<poisoned>}".into(),
                }
            }
            Self::Struct(record) => {
                let name = record.type_descriptor().name().to_string();
                if depth == 0 {
                    return format!("{name} {{..}}");
                }
                match record.fields() {
                    Ok(fields) => {
                        let parts: Vec<String> = fields
                            .iter()
                            .take(PREVIEW_WIDTH)
                            .map(|(n, v)| format!("{n}: {}", v.preview(depth - 1)))
                            .collect();
                        format!("{name} {{ {} }}", parts.join(", "))
                    }
                    Err(_) => format!("{name} {{ <poisoned> }}"),
                }
            }
            Self::Opaque(o) => format!("<{}>", o.type_name()),
        }
    }
}

fn preview_list(items: &[Value], depth: usize) -> String {
    let mut parts: Vec<String> = items
        .iter()
        .take(PREVIEW_WIDTH)
        .map(|v| v.preview(depth))
        .collect();
    if items.len() > PREVIEW_WIDTH {
        parts.push("..".into());
    }
    parts.join(", ")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Temporal(a), Self::Temporal(b)) => a == b,
            _ => self.is_same_reference(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview(3))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview(2))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Temporal> for Value {
    fn from(t: Temporal) -> Self {
        Self::Temporal(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let list = Value::list([Value::from(1), Value::from(2)]);
        let alias = list.clone();
        assert!(list.is_same_reference(&alias));
        assert_eq!(list.identity(), alias.identity());
    }

    #[test]
    fn equal_contents_are_distinct_references() {
        let a = Value::list([Value::from(1)]);
        let b = Value::list([Value::from(1)]);
        assert!(!a.is_same_reference(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn atomic_values_have_no_identity() {
        assert_eq!(Value::from("x").identity(), None);
        assert_eq!(Value::Null.identity(), None);
        assert!(!Value::from(1).is_same_reference(&Value::from(1)));
    }

    #[test]
    fn kind_classification() {
        assert_eq!(Value::from(1).kind(), ValueKind::Number);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Number);
        assert_eq!(Value::map([]).kind(), ValueKind::Map);
        assert!(ValueKind::Str.is_atomic());
        assert!(!ValueKind::Temporal.is_atomic());
        assert!(ValueKind::Struct.is_handle());
    }

    #[test]
    fn option_maps_to_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn preview_terminates_on_cycles() {
        let list = Value::list([]);
        list.as_seq().unwrap().push(list.clone()).unwrap();
        let shown = list.preview(3);
        assert_eq!(shown, "[[[[..]]]]");
    }

    #[test]
    fn preview_truncates_wide_containers() {
        let list = Value::list((0..20).map(Value::from));
        assert_eq!(list.preview(1), "[0, 1, 2, 3, 4, 5, 6, 7, ..]");
    }

    #[test]
    fn type_names_for_reporting() {
        assert_eq!(Value::array([]).type_name(), "array");
        assert_eq!(Value::enum_tag("Color", "Red").type_name(), "Color");
        assert_eq!(Value::from('c').type_name(), "char");
    }
}
