//! Handler construction with one resolver per container.
//!
//! Building a [`ParamsResolver`] is cheap, but handlers created against the
//! same container should share one so that resolver configuration is applied
//! consistently. [`HandlerFactory`] caches resolvers by [`ContainerId`].
//!
//! When a container already provides a [`ParamsResolver`] service, that
//! instance is cached and used instead of a freshly built one.

use crate::config::HandlerConfig;
use crate::handler::InvokableHandler;
use hashbrown::HashMap;
use invokable_params::container::{Container, ContainerId, ServiceKey};
use invokable_params::introspect::Invokable;
use invokable_params::resolver::{ParamsResolver, ResolverConfig};
use parking_lot::Mutex;
use std::sync::Arc;

/// Creates [`InvokableHandler`]s and caches their resolvers per container.
///
/// ```
/// use invokable_handler::prelude::*;
/// use std::sync::Arc;
///
/// let factory = HandlerFactory::new();
/// let container: Arc<dyn Container> = Arc::new(ServiceContainer::new());
///
/// let first = factory.resolver_for(Arc::clone(&container));
/// let second = factory.resolver_for(container);
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(factory.len(), 1);
/// ```
#[derive(Default)]
pub struct HandlerFactory {
    resolvers: Mutex<HashMap<ContainerId, Arc<ParamsResolver>>>,
    resolver_config: ResolverConfig,
    handler_config: HandlerConfig,
}

impl HandlerFactory {
    /// Creates a factory with default configurations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration for resolvers this factory builds.
    ///
    /// Resolvers provided by a container keep their own configuration.
    #[must_use]
    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    /// Sets the configuration given to handlers from [`create`](Self::create).
    #[must_use]
    pub fn with_handler_config(mut self, config: HandlerConfig) -> Self {
        self.handler_config = config;
        self
    }

    /// Returns the resolver for `container`, creating and caching it on
    /// first use.
    ///
    /// Concurrent first calls for the same container all receive the same
    /// instance.
    pub fn resolver_for(&self, container: Arc<dyn Container>) -> Arc<ParamsResolver> {
        let id = container.id();
        if let Some(resolver) = self.resolvers.lock().get(&id) {
            return Arc::clone(resolver);
        }

        // The container is queried without the cache lock held, so lazy
        // services may call back into this factory.
        let candidate = match provided_resolver(container.as_ref()) {
            Some(resolver) => {
                tracing::debug!(container = %id, "using params resolver provided by container");
                resolver
            }
            None => {
                tracing::debug!(container = %id, "building params resolver");
                Arc::new(ParamsResolver::new(container).with_config(self.resolver_config))
            }
        };

        // First insert wins; racing callers drop their candidate.
        Arc::clone(self.resolvers.lock().entry(id).or_insert(candidate))
    }

    /// Creates a handler for `entrypoint` with the factory's handler
    /// configuration.
    pub fn create<E: Invokable>(&self, container: Arc<dyn Container>, entrypoint: E) -> InvokableHandler<E> {
        self.create_with_config(container, entrypoint, self.handler_config.clone())
    }

    /// Creates a handler for a default-constructed entrypoint.
    pub fn create_default<E: Invokable + Default>(&self, container: Arc<dyn Container>) -> InvokableHandler<E> {
        self.create(container, E::default())
    }

    /// Creates a handler with an explicit handler configuration.
    pub fn create_with_config<E: Invokable>(
        &self,
        container: Arc<dyn Container>,
        entrypoint: E,
        config: HandlerConfig,
    ) -> InvokableHandler<E> {
        let resolver = self.resolver_for(container);
        tracing::trace!(handler = entrypoint.name(), "creating handler");
        InvokableHandler::with_config(entrypoint, resolver, config)
    }

    /// Drops the cached resolver for `id`. Returns `true` if one was cached.
    pub fn evict(&self, id: ContainerId) -> bool {
        self.resolvers.lock().remove(&id).is_some()
    }

    /// Returns `true` if a resolver is cached for `id`.
    #[must_use]
    pub fn contains(&self, id: ContainerId) -> bool {
        self.resolvers.lock().contains_key(&id)
    }

    /// Number of cached resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.lock().len()
    }

    /// Returns `true` if no resolver is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.lock().is_empty()
    }
}

impl core::fmt::Debug for HandlerFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerFactory")
            .field("cached", &self.len())
            .field("resolver_config", &self.resolver_config)
            .field("handler_config", &self.handler_config)
            .finish()
    }
}

fn provided_resolver(container: &dyn Container) -> Option<Arc<ParamsResolver>> {
    let key = ServiceKey::of::<ParamsResolver>();
    if !container.has(&key) {
        return None;
    }

    match container.get(&key) {
        Ok(value) => {
            let resolver = value.downcast::<ParamsResolver>();
            if resolver.is_none() {
                tracing::warn!(
                    container = %container.id(),
                    actual = value.kind_name(),
                    "container entry for params resolver has the wrong type"
                );
            }
            resolver
        }
        Err(err) => {
            tracing::warn!(container = %container.id(), error = %err, "container failed to provide params resolver");
            None
        }
    }
}
