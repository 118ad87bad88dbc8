use std::ops::Deref;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::{read_lock, write_lock, Value};

/// The container a sequence came from. Every flavour is index-addressable
/// and sequences of different flavours are compared with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeqFlavor {
    Array,
    List,
    Set,
}

impl SeqFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::List => "list",
            Self::Set => "set",
        }
    }
}

/// Contents of a sequence handle.
pub struct SeqValue {
    flavor: SeqFlavor,
    items: RwLock<Vec<Value>>,
}

impl SeqValue {
    pub fn flavor(&self) -> SeqFlavor {
        self.flavor
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Result<Vec<Value>, TypeError> {
        Ok(read_lock(&self.items, "sequence")?.clone())
    }

    pub fn len(&self) -> Result<usize, TypeError> {
        Ok(read_lock(&self.items, "sequence")?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TypeError> {
        Ok(self.len()? == 0)
    }

    pub fn push(&self, value: impl Into<Value>) -> Result<(), TypeError> {
        write_lock(&self.items, "sequence")?.push(value.into());
        Ok(())
    }

    /// Edit the elements in place under the write lock. A panic inside `f`
    /// poisons the sequence; later reads report [`TypeError::Poisoned`].
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Result<R, TypeError> {
        let mut items = write_lock(&self.items, "sequence")?;
        Ok(f(&mut items))
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn replace(&self, index: usize, value: impl Into<Value>) -> Result<Option<Value>, TypeError> {
        let mut items = write_lock(&self.items, "sequence")?;
        Ok(items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value.into())))
    }
}

/// Shared handle to a sequence.
#[derive(Clone)]
pub struct SeqRef(Arc<SeqValue>);

impl SeqRef {
    pub fn new(flavor: SeqFlavor, items: impl IntoIterator<Item = Value>) -> Self {
        Self(Arc::new(SeqValue {
            flavor,
            items: RwLock::new(items.into_iter().collect()),
        }))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Deref for SeqRef {
    type Target = SeqValue;

    fn deref(&self) -> &SeqValue {
        &self.0
    }
}

/// Contents of a map handle: key/value entries in insertion order.
///
/// Keys are arbitrary values. `insert` replaces an entry whose key is
/// shallowly equal (same atomic value or same handle); structurally equal
/// but distinct key handles are kept as separate entries.
pub struct MapValue {
    entries: RwLock<Vec<(Value, Value)>>,
}

impl MapValue {
    /// Snapshot of the current entries.
    pub fn entries(&self) -> Result<Vec<(Value, Value)>, TypeError> {
        Ok(read_lock(&self.entries, "map")?.clone())
    }

    pub fn len(&self) -> Result<usize, TypeError> {
        Ok(read_lock(&self.entries, "map")?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TypeError> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>, TypeError> {
        let entries = read_lock(&self.entries, "map")?;
        Ok(entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    /// Insert or replace, returning the previous value for the key.
    pub fn insert(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, TypeError> {
        let (key, value) = (key.into(), value.into());
        let mut entries = write_lock(&self.entries, "map")?;
        if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(&mut entry.1, value)));
        }
        entries.push((key, value));
        Ok(None)
    }

    pub fn remove(&self, key: &Value) -> Result<Option<Value>, TypeError> {
        let mut entries = write_lock(&self.entries, "map")?;
        Ok(entries
            .iter()
            .position(|(k, _)| k == key)
            .map(|pos| entries.remove(pos).1))
    }
}

/// Shared handle to a map.
#[derive(Clone)]
pub struct MapRef(Arc<MapValue>);

impl MapRef {
    pub fn new(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut slots: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match slots.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => slots.push((key, value)),
            }
        }
        Self(Arc::new(MapValue {
            entries: RwLock::new(slots),
        }))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Deref for MapRef {
    type Target = MapValue;

    fn deref(&self) -> &MapValue {
        &self.0
    }
}

impl From<SeqRef> for Value {
    fn from(seq: SeqRef) -> Self {
        Value::Seq(seq)
    }
}

impl From<MapRef> for Value {
    fn from(map: MapRef) -> Self {
        Value::Map(map)
    }
}
