//! Service containers.
//!
//! The resolver only sees the [`Container`] trait: a keyed lookup capability
//! with a stable identity. [`ServiceContainer`] is the in-crate
//! implementation, storing ready values and lazily built services.
//!
//! # Example
//!
//! ```
//! use invokable_params::container::{Container, ServiceContainer, ServiceKey};
//! use invokable_params::value::Value;
//!
//! struct Mailer { from: String }
//!
//! let mut services = ServiceContainer::new();
//! services.insert(Mailer { from: "noreply@example.com".into() });
//! services.insert_named("year", 1492);
//!
//! assert!(services.has(&ServiceKey::of::<Mailer>()));
//! assert_eq!(services.get(&ServiceKey::name("year")).unwrap(), Value::Int(1492));
//!
//! let mailer = services.get_typed::<Mailer>().unwrap();
//! assert_eq!(mailer.from, "noreply@example.com");
//! ```

use crate::error::ContainerError;
use crate::value::{TypeKey, Value};
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Keys and identity
// ─────────────────────────────────────────────────────────────────────────────

/// Address of a service: a Rust type or an arbitrary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    /// A service addressed by its type.
    Type(TypeKey),
    /// A service addressed by name.
    Name(String),
}

impl ServiceKey {
    /// Key for the service of type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeKey::of::<T>())
    }

    /// Key for a named service.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl From<TypeKey> for ServiceKey {
    fn from(key: TypeKey) -> Self {
        Self::Type(key)
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(key) => fmt::Display::fmt(key, f),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Stable identity of a container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Container trait
// ─────────────────────────────────────────────────────────────────────────────

/// Keyed service lookup.
///
/// `get` may construct services lazily; callers must not assume it is free
/// of side effects. Implementations must be safe to share across threads.
pub trait Container: Send + Sync {
    /// Identity used for per-container caches.
    fn id(&self) -> ContainerId;

    /// Returns `true` if a service is registered under `key`.
    fn has(&self, key: &ServiceKey) -> bool;

    /// Returns the service registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::NotFound`] for unknown keys and
    /// [`ContainerError::Factory`] when a lazy service fails to build.
    fn get(&self, key: &ServiceKey) -> Result<Value, ContainerError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ServiceContainer
// ─────────────────────────────────────────────────────────────────────────────

type Factory = Box<dyn Fn() -> Result<Value, ContainerError> + Send + Sync>;

enum ServiceEntry {
    Ready(Value),
    Lazy {
        factory: Factory,
        // Held while the factory runs so it executes at most once.
        built: Mutex<Option<Value>>,
    },
}

impl ServiceEntry {
    fn lazy(factory: Factory) -> Self {
        Self::Lazy {
            factory,
            built: Mutex::new(None),
        }
    }

    fn resolve(&self) -> Result<Value, ContainerError> {
        match self {
            Self::Ready(value) => Ok(value.clone()),
            Self::Lazy { factory, built } => {
                let mut slot = built.lock();
                if let Some(value) = slot.as_ref() {
                    return Ok(value.clone());
                }
                let value = factory()?;
                *slot = Some(value.clone());
                Ok(value)
            }
        }
    }
}

/// In-memory [`Container`] of ready values and lazy services.
///
/// Registration takes `&mut self`; lookups take `&self` and are thread-safe.
/// Lazy factories run on first `get` and their result is memoized. A failed
/// factory is retried on the next `get`.
pub struct ServiceContainer {
    id: ContainerId,
    services: HashMap<ServiceKey, ServiceEntry>,
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceContainer {
    /// Creates an empty container with a fresh [`ContainerId`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ContainerId::next(),
            services: HashMap::new(),
        }
    }

    /// Registers a service under its own type, replacing any previous one.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.insert_arc(Arc::new(service));
    }

    /// Registers a shared service under its own type.
    pub fn insert_arc<T: Any + Send + Sync>(&mut self, service: Arc<T>) {
        self.insert_value(ServiceKey::of::<T>(), Value::from_arc(service));
    }

    /// Registers a value under a name.
    pub fn insert_named(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.insert_value(ServiceKey::name(name), value.into());
    }

    /// Registers a value under an arbitrary key.
    pub fn insert_value(&mut self, key: ServiceKey, value: Value) {
        self.services.insert(key, ServiceEntry::Ready(value));
    }

    /// Registers a service of type `T` built on first lookup.
    pub fn register_lazy<T, F>(&mut self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move || factory().map(Value::object));
        self.services
            .insert(ServiceKey::of::<T>(), ServiceEntry::lazy(factory));
    }

    /// Registers a named value built on first lookup.
    pub fn register_lazy_named<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Value, ContainerError> + Send + Sync + 'static,
    {
        self.services
            .insert(ServiceKey::name(name), ServiceEntry::lazy(Box::new(factory)));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.insert(service);
        self
    }

    /// Builder form of [`insert_named`](Self::insert_named).
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_named(name, value);
        self
    }

    /// Removes a service. Returns `true` if it was registered.
    pub fn remove(&mut self, key: &ServiceKey) -> bool {
        self.services.remove(key).is_some()
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Looks up the service of type `T` and downcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::NotFound`] if nothing of type `T` is
    /// registered, or the factory error for a failing lazy service.
    pub fn get_typed<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ContainerError> {
        let key = ServiceKey::of::<T>();
        self.get(&key)?
            .downcast::<T>()
            .ok_or_else(|| ContainerError::NotFound(key.to_string()))
    }
}

impl Container for ServiceContainer {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn has(&self, key: &ServiceKey) -> bool {
        self.services.contains_key(key)
    }

    fn get(&self, key: &ServiceKey) -> Result<Value, ContainerError> {
        self.services
            .get(key)
            .ok_or_else(|| ContainerError::NotFound(key.to_string()))?
            .resolve()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("id", &self.id)
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicUsize;

    struct Database {
        url: String,
    }

    #[test]
    fn keys_display_their_address() {
        assert_eq!(
            ServiceKey::of::<Database>().to_string(),
            core::any::type_name::<Database>()
        );
        assert_eq!(ServiceKey::name("year").to_string(), "year");
    }

    #[test]
    fn ids_are_unique() {
        let a = ServiceContainer::new();
        let b = ServiceContainer::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn typed_and_named_lookup() {
        let services = ServiceContainer::new()
            .with(Database {
                url: "sqlite::memory:".into(),
            })
            .with_named("answer", 42);

        assert!(services.has(&ServiceKey::of::<Database>()));
        assert!(!services.has(&ServiceKey::name("Database")));
        assert_eq!(services.get_typed::<Database>().unwrap().url, "sqlite::memory:");
        assert_eq!(services.get(&"answer".into()).unwrap(), Value::Int(42));
        assert_eq!(
            services.get(&"missing".into()).unwrap_err(),
            ContainerError::NotFound("missing".into())
        );
    }

    #[test]
    fn lazy_services_are_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut services = ServiceContainer::new();
        services.register_lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Database {
                url: "postgres://localhost".into(),
            })
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let first = services.get_typed::<Database>().unwrap();
        let second = services.get_typed::<Database>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_factory_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut services = ServiceContainer::new();
        services.register_lazy_named("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ContainerError::factory("flaky", "not yet"))
            } else {
                Ok(Value::Bool(true))
            }
        });

        let key = ServiceKey::name("flaky");
        assert!(matches!(
            services.get(&key),
            Err(ContainerError::Factory { .. })
        ));
        assert_eq!(services.get(&key).unwrap(), Value::Bool(true));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn remove() {
        let mut services = ServiceContainer::new().with_named("a", 1);
        assert!(services.remove(&"a".into()));
        assert!(!services.remove(&"a".into()));
        assert!(services.is_empty());
    }
}
