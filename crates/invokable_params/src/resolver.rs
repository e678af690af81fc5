//! Argument resolution.
//!
//! [`resolve`] maps an ordered descriptor list onto an ordered argument list.
//! For each descriptor the first matching source wins:
//!
//! | # | Source | Applies to | Coerced |
//! |---|--------|------------|---------|
//! | 1 | type-keyed pool override | object kinds | no |
//! | 2 | container, by type | object kinds | no |
//! | 3 | named pool entry | all | scalar kinds |
//! | 4 | container, by name | all (if enabled) | no |
//! | 5 | declared default | all | no |
//! | 6 | null | nullable | no |
//!
//! A null value from any source counts as absent. When a named pool entry
//! fails scalar coercion the descriptor's default is used, or null if there
//! is none; later sources are not consulted.
//!
//! [`ParamsResolver`] binds the algorithm to a container and a
//! [`ResolverConfig`].

use crate::argument::ResolvedArguments;
use crate::coerce::coerce;
use crate::container::{Container, ServiceKey};
use crate::descriptor::ParameterDescriptor;
use crate::error::ResolveError;
use crate::introspect::{Invokable, introspect};
use crate::pool::ResolutionPool;
use crate::value::Value;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// ResolverConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Resolution options.
///
/// Deserializes from partial documents; missing fields keep their defaults.
///
/// ```
/// use invokable_params::resolver::ResolverConfig;
///
/// let config: ResolverConfig = serde_json::from_str(r#"{"coerce_scalars": false}"#).unwrap();
/// assert!(!config.coerce_scalars);
/// assert!(config.lookup_by_name);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Coerce named pool entries to the declared scalar kind.
    pub coerce_scalars: bool,
    /// Consult the container by parameter name after the named pool.
    pub lookup_by_name: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            coerce_scalars: true,
            lookup_by_name: true,
        }
    }
}

impl ResolverConfig {
    /// Enables or disables scalar coercion.
    #[must_use]
    pub fn with_coerce_scalars(mut self, enabled: bool) -> Self {
        self.coerce_scalars = enabled;
        self
    }

    /// Enables or disables container lookups by parameter name.
    #[must_use]
    pub fn with_lookup_by_name(mut self, enabled: bool) -> Self {
        self.lookup_by_name = enabled;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Algorithm
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves one argument per descriptor, in descriptor order.
///
/// # Errors
///
/// - [`ResolveError::UnresolvedParameter`] if a required parameter has no source
/// - [`ResolveError::Container`] if the container reports a service it then
///   fails to provide
pub fn resolve(
    descriptors: &[ParameterDescriptor],
    pool: &ResolutionPool,
    container: &dyn Container,
    config: &ResolverConfig,
) -> Result<ResolvedArguments, ResolveError> {
    descriptors
        .iter()
        .map(|descriptor| resolve_parameter(descriptor, pool, container, config))
        .collect::<Result<Vec<_>, _>>()
        .map(ResolvedArguments::new)
}

fn resolve_parameter(
    descriptor: &ParameterDescriptor,
    pool: &ResolutionPool,
    container: &dyn Container,
    config: &ResolverConfig,
) -> Result<Value, ResolveError> {
    let name = descriptor.name();
    let kind = descriptor.declared_kind();

    if let Some(key) = kind.object_type() {
        if let Some(value) = pool.typed(&key).filter(|v| !v.is_null()) {
            tracing::trace!(parameter = name, ty = key.name(), "resolved from type override");
            return Ok(value.clone());
        }
        if let Some(value) = lookup(container, &ServiceKey::Type(key), name)? {
            tracing::trace!(parameter = name, ty = key.name(), "resolved from container by type");
            return Ok(value);
        }
    }

    if let Some(raw) = pool.get(name).filter(|v| !v.is_null()) {
        let Some(scalar) = kind.scalar().filter(|_| config.coerce_scalars) else {
            tracing::trace!(parameter = name, "resolved from pool");
            return Ok(raw.clone());
        };
        if let Some(value) = coerce(scalar, raw) {
            tracing::trace!(parameter = name, kind = %scalar, "resolved from pool with coercion");
            return Ok(value);
        }
        let fallback = descriptor.default_value().cloned().unwrap_or_default();
        tracing::debug!(
            parameter = name,
            kind = %scalar,
            raw = raw.kind_name(),
            fallback = fallback.kind_name(),
            "coercion failed, using fallback"
        );
        return Ok(fallback);
    }

    if config.lookup_by_name
        && let Some(value) = lookup(container, &ServiceKey::name(name), name)?
    {
        tracing::trace!(parameter = name, "resolved from container by name");
        return Ok(value);
    }

    if let Some(default) = descriptor.default_value() {
        tracing::trace!(parameter = name, "resolved from default");
        return Ok(default.clone());
    }

    if descriptor.is_nullable() {
        tracing::trace!(parameter = name, "resolved to null");
        return Ok(Value::Null);
    }

    tracing::debug!(parameter = name, position = descriptor.position(), "unresolved parameter");
    Err(ResolveError::UnresolvedParameter {
        name: name.to_string(),
        position: descriptor.position(),
    })
}

fn lookup(
    container: &dyn Container,
    key: &ServiceKey,
    parameter: &str,
) -> Result<Option<Value>, ResolveError> {
    if !container.has(key) {
        return Ok(None);
    }
    let value = container
        .get(key)
        .map_err(|source| ResolveError::Container {
            parameter: parameter.to_string(),
            source,
        })?;
    Ok((!value.is_null()).then_some(value))
}

// ─────────────────────────────────────────────────────────────────────────────
// ParamsResolver
// ─────────────────────────────────────────────────────────────────────────────

/// A resolver bound to a container.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of concurrent resolutions.
///
/// ```
/// use invokable_params::container::ServiceContainer;
/// use invokable_params::descriptor::{DeclaredKind, ParameterDescriptor};
/// use invokable_params::pool::ResolutionPool;
/// use invokable_params::resolver::ParamsResolver;
/// use invokable_params::value::Value;
/// use std::sync::Arc;
///
/// let resolver = ParamsResolver::new(Arc::new(ServiceContainer::new().with_named("year", 1492)));
/// let descriptors = [
///     ParameterDescriptor::new("id", 0, DeclaredKind::Int),
///     ParameterDescriptor::new("year", 1, DeclaredKind::Int),
/// ];
/// let pool = ResolutionPool::from_attributes([("id", Value::from("42"))]);
///
/// let args = resolver.resolve(&descriptors, &pool).unwrap();
/// assert_eq!(args.into_vec(), vec![Value::Int(42), Value::Int(1492)]);
/// ```
#[derive(Clone)]
pub struct ParamsResolver {
    container: Arc<dyn Container>,
    config: ResolverConfig,
}

impl ParamsResolver {
    /// Creates a resolver with the default configuration.
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self {
            container,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The bound container.
    #[must_use]
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `descriptors` against `pool` and the bound container.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn resolve(
        &self,
        descriptors: &[ParameterDescriptor],
        pool: &ResolutionPool,
    ) -> Result<ResolvedArguments, ResolveError> {
        self.resolve_with(descriptors, pool, &self.config)
    }

    /// Resolves with a per-call configuration instead of the bound one.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn resolve_with(
        &self,
        descriptors: &[ParameterDescriptor],
        pool: &ResolutionPool,
        config: &ResolverConfig,
    ) -> Result<ResolvedArguments, ResolveError> {
        resolve(descriptors, pool, self.container.as_ref(), config)
    }

    /// Introspects `entrypoint` and resolves its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Introspection`] if the entrypoint cannot be
    /// introspected, otherwise see [`resolve`].
    pub fn resolve_entrypoint(
        &self,
        entrypoint: &dyn Invokable,
        pool: &ResolutionPool,
    ) -> Result<ResolvedArguments, ResolveError> {
        let descriptors = introspect(entrypoint)?;
        self.resolve(&descriptors, pool)
    }
}

impl fmt::Debug for ParamsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamsResolver")
            .field("container", &self.container.id())
            .field("config", &self.config)
            .finish()
    }
}
