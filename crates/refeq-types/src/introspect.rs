//! Conversion of host data into the comparable value model.
//!
//! Rust types have no runtime field metadata, so every type that takes part
//! in structural comparison registers itself by implementing [`Introspect`].
//! Records describe their fields with a [`TypeDescriptor`](crate::TypeDescriptor); containers and
//! primitives come with implementations below.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::temporal::Temporal;
use crate::value::Value;

/// Capability to expose a value's structure for comparison.
pub trait Introspect {
    fn introspect(&self) -> Value;
}

impl Introspect for Value {
    fn introspect(&self) -> Value {
        self.clone()
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn introspect(&self) -> Value {
        (**self).introspect()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn introspect(&self) -> Value {
        (**self).introspect()
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn introspect(&self) -> Value {
        (**self).introspect()
    }
}

impl Introspect for bool {
    fn introspect(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! introspect_int {
    ($($t:ty),*) => {
        $(impl Introspect for $t {
            fn introspect(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        })*
    };
}

introspect_int!(i8, i16, i32, i64, u8, u16, u32);

impl Introspect for u64 {
    fn introspect(&self) -> Value {
        i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
    }
}

impl Introspect for usize {
    fn introspect(&self) -> Value {
        i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
    }
}

impl Introspect for f32 {
    fn introspect(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Introspect for f64 {
    fn introspect(&self) -> Value {
        Value::Float(*self)
    }
}

impl Introspect for char {
    fn introspect(&self) -> Value {
        Value::Char(*self)
    }
}

impl Introspect for str {
    fn introspect(&self) -> Value {
        Value::from(self)
    }
}

impl Introspect for String {
    fn introspect(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn introspect(&self) -> Value {
        self.as_ref().map_or(Value::Null, Introspect::introspect)
    }
}

impl<T: Introspect> Introspect for [T] {
    fn introspect(&self) -> Value {
        Value::array(self.iter().map(Introspect::introspect))
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn introspect(&self) -> Value {
        Value::array(self.iter().map(Introspect::introspect))
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn introspect(&self) -> Value {
        Value::list(self.iter().map(Introspect::introspect))
    }
}

impl<T: Introspect, S> Introspect for HashSet<T, S> {
    fn introspect(&self) -> Value {
        Value::set(self.iter().map(Introspect::introspect))
    }
}

impl<T: Introspect> Introspect for BTreeSet<T> {
    fn introspect(&self) -> Value {
        Value::set(self.iter().map(Introspect::introspect))
    }
}

impl<K: Introspect, V: Introspect, S> Introspect for HashMap<K, V, S> {
    fn introspect(&self) -> Value {
        Value::map(self.iter().map(|(k, v)| (k.introspect(), v.introspect())))
    }
}

impl<K: Introspect, V: Introspect> Introspect for BTreeMap<K, V> {
    fn introspect(&self) -> Value {
        Value::map(self.iter().map(|(k, v)| (k.introspect(), v.introspect())))
    }
}

impl Introspect for Temporal {
    fn introspect(&self) -> Value {
        Value::Temporal(*self)
    }
}

macro_rules! introspect_temporal {
    ($($t:ty),*) => {
        $(impl Introspect for $t {
            fn introspect(&self) -> Value {
                Value::Temporal(Temporal::from(*self))
            }
        })*
    };
}

introspect_temporal!(
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    DateTime<FixedOffset>
);

/// JSON documents map onto the value model directly: objects become maps
/// with string keys, arrays become lists.
impl Introspect for serde_json::Value {
    fn introspect(&self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::list(items.iter().map(Introspect::introspect))
            }
            serde_json::Value::Object(fields) => Value::map(
                fields
                    .iter()
                    .map(|(k, v)| (Value::from(k.as_str()), v.introspect())),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives() {
        assert_eq!(7u8.introspect(), Value::Int(7));
        assert_eq!(true.introspect(), Value::Bool(true));
        assert_eq!("x".introspect(), Value::from("x"));
        assert_eq!(u64::MAX.introspect().kind(), crate::ValueKind::Number);
    }

    #[test]
    fn option_none_is_null() {
        assert!(None::<String>.introspect().is_null());
        assert_eq!(Some(3i32).introspect(), Value::Int(3));
    }

    #[test]
    fn vec_and_array_flavours() {
        let list = vec![1, 2].introspect();
        let array = [1, 2].introspect();
        assert_eq!(list.type_name(), "list");
        assert_eq!(array.type_name(), "array");
        assert_eq!(list.as_seq().unwrap().len().unwrap(), 2);
    }

    #[test]
    fn maps_keep_every_entry() {
        let mut source = BTreeMap::new();
        source.insert("a", 1);
        source.insert("b", 2);
        let value = source.introspect();
        let entries = value.as_map().unwrap().entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Value::from("a"), Value::Int(1)));
    }

    #[test]
    fn json_document() {
        let doc = json!({"name": "x", "tags": [1, 2.5], "none": null});
        let value = doc.introspect();
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Value::from("name")).unwrap(), Some(Value::from("x")));
        let tags = map.get(&Value::from("tags")).unwrap().unwrap();
        let items = tags.as_seq().unwrap().items().unwrap();
        assert_eq!(items, vec![Value::Int(1), Value::Float(2.5)]);
        assert_eq!(map.get(&Value::from("none")).unwrap(), Some(Value::Null));
    }

    #[test]
    fn temporal_types() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
        assert_eq!(date.introspect().kind(), crate::ValueKind::Temporal);
    }
}
