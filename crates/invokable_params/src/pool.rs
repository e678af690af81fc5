//! The per-call resolution pool.
//!
//! A [`ResolutionPool`] holds the values already known to the caller before
//! resolution starts: named entries (usually request attributes) and
//! type-keyed overrides for object parameters. Pools are assembled with a
//! [`PoolBuilder`] and are read-only afterwards.

use crate::value::{TypeKey, Value};
use core::any::Any;
use indexmap::IndexMap;
use std::sync::Arc;

/// Named and type-keyed candidate values for one resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionPool {
    named: IndexMap<String, Value>,
    typed: IndexMap<TypeKey, Value>,
}

impl ResolutionPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a pool.
    #[must_use]
    pub fn builder() -> PoolBuilder {
        PoolBuilder::default()
    }

    /// Creates a pool of named entries. Later duplicates replace earlier ones.
    pub fn from_attributes<K, I>(attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::builder().extend_named(attributes).build()
    }

    /// Creates a pool of named entries from a JSON object.
    #[must_use]
    pub fn from_json(attributes: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_attributes(attributes.into_iter().map(|(k, v)| (k, Value::from(v))))
    }

    /// Returns the named entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Returns the type-keyed override for `key`.
    #[must_use]
    pub fn typed(&self, key: &TypeKey) -> Option<&Value> {
        self.typed.get(key)
    }

    /// Returns `true` if a named entry exists, even if it is null.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Iterates over named entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Number of named entries plus type-keyed overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + self.typed.len()
    }

    /// Returns `true` if the pool holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.typed.is_empty()
    }
}

/// Builder for [`ResolutionPool`].
///
/// ```
/// use invokable_params::pool::ResolutionPool;
/// use invokable_params::value::Value;
/// use std::sync::Arc;
///
/// struct Clock;
///
/// let pool = ResolutionPool::builder()
///     .with_named("year", 1492)
///     .with_object(Arc::new(Clock))
///     .build();
///
/// assert_eq!(pool.get("year"), Some(&Value::Int(1492)));
/// assert_eq!(pool.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct PoolBuilder {
    pool: ResolutionPool,
}

impl PoolBuilder {
    /// Adds a named entry.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pool.named.insert(name.into(), value.into());
        self
    }

    /// Adds several named entries.
    #[must_use]
    pub fn extend_named<K, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.pool
            .named
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Adds a type-keyed override.
    #[must_use]
    pub fn with_override(mut self, key: TypeKey, value: impl Into<Value>) -> Self {
        self.pool.typed.insert(key, value.into());
        self
    }

    /// Adds a type-keyed override for the object's own type.
    #[must_use]
    pub fn with_object<T: Any + Send + Sync>(self, object: Arc<T>) -> Self {
        self.with_override(TypeKey::of::<T>(), Value::from_arc(object))
    }

    /// Finishes the pool.
    #[must_use]
    pub fn build(self) -> ResolutionPool {
        self.pool
    }
}
