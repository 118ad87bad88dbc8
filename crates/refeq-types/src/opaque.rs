use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A foreign value the engine cannot look inside, such as a lazy-loading
/// handle owned by a persistence layer.
///
/// Without a resolver that understands the payload, opaque values only
/// compare equal to themselves.
pub struct OpaqueValue {
    type_name: String,
    payload: Box<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }
}

/// Shared handle to an opaque value.
#[derive(Clone)]
pub struct OpaqueRef(Arc<OpaqueValue>);

impl OpaqueRef {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, payload: T) -> Self {
        Self(Arc::new(OpaqueValue {
            type_name: type_name.into(),
            payload: Box::new(payload),
        }))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Deref for OpaqueRef {
    type Target = OpaqueValue;

    fn deref(&self) -> &OpaqueValue {
        &self.0
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueRef({})", self.type_name)
    }
}

impl From<OpaqueRef> for crate::Value {
    fn from(handle: OpaqueRef) -> Self {
        crate::Value::Opaque(handle)
    }
}
