use std::sync::Arc;

use refeq_diff::{Difference, ObjectDifference};
use refeq_types::{ComparisonModes, Value};

use crate::comparator::{Comparator, ValuePair};
use crate::engine::Comparison;
use crate::error::EngineResult;

/// Hook for values that stand in for data loaded on demand, such as
/// persistence-layer proxies.
///
/// Implementations recognise their own handles (usually opaque values) and
/// must not force a load from `is_uninitialized`, `entity_name` or
/// `surrogate_key`. Failures are reported as
/// [`EngineError::Resolver`](crate::EngineError::Resolver) and abort the
/// comparison.
pub trait LazyResolver: Send + Sync {
    /// Name of the resolver, for error reporting.
    fn name(&self) -> &str;

    /// Returns `true` if `value` is a lazy handle this resolver understands.
    fn is_lazy_reference(&self, value: &Value) -> bool;

    /// Returns `true` if the handle's target has not been loaded yet.
    fn is_uninitialized(&self, value: &Value) -> EngineResult<bool>;

    /// Name of the entity the handle refers to.
    fn entity_name(&self, value: &Value) -> EngineResult<Option<String>>;

    /// Identifier of the referenced entity.
    fn surrogate_key(&self, value: &Value) -> EngineResult<Value>;

    /// The loaded target of the handle.
    fn unwrap(&self, value: &Value) -> EngineResult<Value>;
}

/// Compares lazy handles without loading them when possible.
///
/// Two unloaded handles are compared by entity name and surrogate key only.
/// Otherwise each handle is replaced by its target and the pair is compared
/// again through the engine.
pub struct LazyReferenceComparator {
    resolver: Arc<dyn LazyResolver>,
}

impl LazyReferenceComparator {
    pub fn new(resolver: Arc<dyn LazyResolver>) -> Self {
        Self { resolver }
    }

    fn is_unloaded(&self, value: &Value) -> EngineResult<bool> {
        Ok(self.resolver.is_lazy_reference(value) && self.resolver.is_uninitialized(value)?)
    }

    fn target(&self, value: &Value) -> EngineResult<Value> {
        if self.resolver.is_lazy_reference(value) {
            self.resolver.unwrap(value)
        } else {
            Ok(value.clone())
        }
    }
}

impl Comparator for LazyReferenceComparator {
    fn name(&self) -> &str {
        "lazy-reference"
    }

    fn applies(&self, pair: &ValuePair<'_>, _modes: ComparisonModes) -> bool {
        self.resolver.is_lazy_reference(pair.left) || self.resolver.is_lazy_reference(pair.right)
    }

    fn compare(
        &self,
        pair: &ValuePair<'_>,
        comparison: &mut Comparison<'_>,
    ) -> EngineResult<Option<Difference>> {
        if self.is_unloaded(pair.left)? && self.is_unloaded(pair.right)? {
            let left_entity = self.resolver.entity_name(pair.left)?;
            let right_entity = self.resolver.entity_name(pair.right)?;
            if left_entity.is_none() || left_entity != right_entity {
                let reason = format!(
                    "Different proxy types. Left: {}, right: {}",
                    left_entity.as_deref().unwrap_or("null"),
                    right_entity.as_deref().unwrap_or("null")
                );
                return Ok(Some(pair.leaf(reason)));
            }

            let left_key = self.resolver.surrogate_key(pair.left)?;
            let right_key = self.resolver.surrogate_key(pair.right)?;
            let Some(key_difference) = comparison.difference(&left_key, &right_key)? else {
                return Ok(None);
            };
            let mut difference = ObjectDifference::new(
                "Different proxy values",
                pair.left.clone(),
                pair.right.clone(),
            );
            difference.add_field("<proxy id>", key_difference);
            return Ok(Some(difference.into()));
        }

        let left = self.target(pair.left)?;
        let right = self.target(pair.right)?;
        comparison.difference(&left, &right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refeq_types::{OpaqueRef, TypeDescriptor};

    use crate::{EngineConfig, EngineError, EquivalenceEngine};

    struct Proxy {
        entity: &'static str,
        id: i64,
        target: Option<Value>,
    }

    fn proxy(entity: &'static str, id: i64, target: Option<Value>) -> Value {
        Value::from(OpaqueRef::new("Proxy", Proxy { entity, id, target }))
    }

    struct ProxyResolver;

    impl ProxyResolver {
        fn proxy<'a>(&self, value: &'a Value) -> EngineResult<&'a Proxy> {
            value
                .as_opaque()
                .and_then(|o| o.downcast_ref::<Proxy>())
                .ok_or_else(|| EngineError::resolver(self.name(), "not a proxy"))
        }
    }

    impl LazyResolver for ProxyResolver {
        fn name(&self) -> &str {
            "proxy"
        }

        fn is_lazy_reference(&self, value: &Value) -> bool {
            value.as_opaque().is_some_and(|o| o.is::<Proxy>())
        }

        fn is_uninitialized(&self, value: &Value) -> EngineResult<bool> {
            Ok(self.proxy(value)?.target.is_none())
        }

        fn entity_name(&self, value: &Value) -> EngineResult<Option<String>> {
            Ok(Some(self.proxy(value)?.entity.to_string()))
        }

        fn surrogate_key(&self, value: &Value) -> EngineResult<Value> {
            Ok(Value::from(self.proxy(value)?.id))
        }

        fn unwrap(&self, value: &Value) -> EngineResult<Value> {
            self.proxy(value)?
                .target
                .clone()
                .ok_or_else(|| EngineError::resolver(self.name(), "target not loaded"))
        }
    }

    /// Refuses to load anything.
    struct FailingResolver;

    impl LazyResolver for FailingResolver {
        fn name(&self) -> &str {
            "failing"
        }

        fn is_lazy_reference(&self, value: &Value) -> bool {
            value.as_opaque().is_some()
        }

        fn is_uninitialized(&self, _value: &Value) -> EngineResult<bool> {
            Err(EngineError::resolver("failing", "session closed"))
        }

        fn entity_name(&self, _value: &Value) -> EngineResult<Option<String>> {
            Ok(None)
        }

        fn surrogate_key(&self, _value: &Value) -> EngineResult<Value> {
            Ok(Value::Null)
        }

        fn unwrap(&self, value: &Value) -> EngineResult<Value> {
            Ok(value.clone())
        }
    }

    fn engine() -> EquivalenceEngine {
        EquivalenceEngine::with_resolver(Arc::new(ProxyResolver), EngineConfig::default())
    }

    fn compare(left: &Value, right: &Value) -> Option<Difference> {
        engine()
            .difference(left, right, ComparisonModes::strict())
            .unwrap()
    }

    #[test]
    fn chain_is_headed_by_the_resolver() {
        assert_eq!(engine().chain().names()[0], "lazy-reference");
    }

    #[test]
    fn unloaded_with_same_key_are_equivalent() {
        assert!(compare(&proxy("User", 1, None), &proxy("User", 1, None)).is_none());
    }

    #[test]
    fn unloaded_with_different_keys() {
        let d = compare(&proxy("User", 1, None), &proxy("User", 2, None)).unwrap();
        assert_eq!(d.reason(), "Different proxy values");
        let id = d.field("<proxy id>").unwrap();
        assert_eq!(id.left(), &Value::from(1));
        assert_eq!(d.as_object().unwrap().fields.len(), 1);
    }

    #[test]
    fn unloaded_with_different_entities() {
        let d = compare(&proxy("User", 1, None), &proxy("Group", 1, None)).unwrap();
        assert_eq!(d.reason(), "Different proxy types. Left: User, right: Group");
        assert!(d.is_leaf());
        assert_eq!(d.divergence_count(), 1);
    }

    #[test]
    fn loaded_proxy_is_compared_by_target() {
        let ty = TypeDescriptor::builder("User").field("name").build();
        let user = |name: &str| Value::record(&ty, [("name", Value::from(name))]).unwrap();

        let loaded = proxy("User", 1, Some(user("Ada")));
        assert!(compare(&loaded, &user("Ada")).is_none());

        let d = compare(&user("Bob"), &loaded).unwrap();
        assert!(d.field("name").is_some());
    }

    #[test]
    fn resolver_failure_aborts() {
        let engine =
            EquivalenceEngine::with_resolver(Arc::new(FailingResolver), EngineConfig::default());
        let a = Value::from(OpaqueRef::new("Handle", 1u8));
        let b = Value::from(OpaqueRef::new("Handle", 2u8));
        let err = engine
            .difference(&a, &b, ComparisonModes::strict())
            .unwrap_err();
        assert_eq!(err, EngineError::resolver("failing", "session closed"));
    }

    #[test]
    fn without_resolver_proxies_are_opaque() {
        let d = EquivalenceEngine::default()
            .difference(
                &proxy("User", 1, None),
                &proxy("User", 1, None),
                ComparisonModes::strict(),
            )
            .unwrap()
            .unwrap();
        assert!(d.is_leaf());
    }
}
