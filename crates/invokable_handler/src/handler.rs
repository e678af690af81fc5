//! Request handlers backed by invokable entrypoints.
//!
//! An [`InvokableHandler`] wraps an [`Invokable`] entrypoint. For every
//! request it builds a [`ResolutionPool`] from the request, resolves the
//! entrypoint's arguments with a shared [`ParamsResolver`], calls it and
//! checks that the result is a [`Response`].
//!
//! The pool is assembled in this order:
//!
//! 1. attributes holding an object under that object's own type name become
//!    type-keyed overrides
//! 2. every attribute becomes a named entry
//! 3. configured aliases copy attributes to additional names
//! 4. the request itself becomes the override for [`Request`]

use crate::config::HandlerConfig;
use crate::error::HandlerError;
use crate::http::{Request, Response};
use invokable_params::descriptor::ParameterDescriptor;
use invokable_params::error::IntrospectionError;
use invokable_params::introspect::{Invokable, introspect};
use invokable_params::pool::ResolutionPool;
use invokable_params::resolver::{ParamsResolver, ResolverConfig};
use invokable_params::value::Value;
use std::sync::Arc;

/// Something that turns a request into a response.
pub trait RequestHandler: Send + Sync + 'static {
    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] if arguments cannot be resolved, the
    /// entrypoint fails, or the handler contract is broken.
    fn handle(&self, request: Arc<Request>) -> Result<Response, HandlerError>;
}

/// A [`RequestHandler`] whose entrypoint receives resolved arguments.
///
/// The entrypoint is introspected once, at construction. Descriptor
/// problems surface on every call to [`handle`](RequestHandler::handle).
pub struct InvokableHandler<E> {
    entrypoint: E,
    descriptors: Result<Arc<[ParameterDescriptor]>, IntrospectionError>,
    resolver: Arc<ParamsResolver>,
    config: HandlerConfig,
}

impl<E: Invokable> InvokableHandler<E> {
    /// Wraps `entrypoint` with the default handler configuration.
    pub fn new(entrypoint: E, resolver: Arc<ParamsResolver>) -> Self {
        Self::with_config(entrypoint, resolver, HandlerConfig::default())
    }

    /// Wraps `entrypoint` with an explicit handler configuration.
    pub fn with_config(entrypoint: E, resolver: Arc<ParamsResolver>, config: HandlerConfig) -> Self {
        let descriptors = introspect(&entrypoint).map(Arc::from);
        if let Err(err) = &descriptors {
            tracing::warn!(handler = entrypoint.name(), error = %err, "entrypoint cannot be introspected");
        }
        Self {
            entrypoint,
            descriptors,
            resolver,
            config,
        }
    }

    /// The wrapped entrypoint.
    #[must_use]
    pub fn entrypoint(&self) -> &E {
        &self.entrypoint
    }

    /// The resolver shared with other handlers on the same container.
    #[must_use]
    pub fn resolver(&self) -> &Arc<ParamsResolver> {
        &self.resolver
    }

    /// Handler configuration.
    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// The entrypoint's descriptors.
    ///
    /// # Errors
    ///
    /// Returns the introspection failure recorded at construction.
    pub fn descriptors(&self) -> Result<&[ParameterDescriptor], HandlerError> {
        match &self.descriptors {
            Ok(descriptors) => Ok(&descriptors[..]),
            Err(err) => Err(HandlerError::introspection(self.entrypoint.name(), err.clone())),
        }
    }

    /// Builds the resolution pool for `request`.
    #[must_use]
    pub fn build_pool(&self, request: &Arc<Request>) -> ResolutionPool {
        let attributes = request.attributes();
        let mut builder = ResolutionPool::builder();

        for (name, value) in attributes {
            if let Value::Object(object) = value
                && object.type_key().name() == name
            {
                builder = builder.with_override(object.type_key(), value.clone());
            }
        }

        builder = builder.extend_named(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));

        for (attribute, parameter) in &self.config.attribute_aliases {
            if let Some(value) = attributes.get(attribute)
                && !attributes.contains_key(parameter)
            {
                builder = builder.with_named(parameter.clone(), value.clone());
            }
        }

        builder.with_object(Arc::clone(request)).build()
    }

    /// Resolves arguments for `request` and calls the entrypoint, without
    /// checking the shape of the result.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::MissingEntrypoint`] or
    /// [`HandlerError::Introspection`] for a bad signature,
    /// [`HandlerError::Resolve`] if an argument cannot be resolved and
    /// [`HandlerError::Invoke`] if the entrypoint fails.
    pub fn invoke_entrypoint(&self, request: Arc<Request>) -> Result<Value, HandlerError> {
        let name = self.entrypoint.name();
        let descriptors = self.descriptors()?;
        let pool = self.build_pool(&request);

        let base = self.resolver.config();
        let config: ResolverConfig =
            base.with_coerce_scalars(base.coerce_scalars && self.config.coerce_attributes);

        let args = self
            .resolver
            .resolve_with(descriptors, &pool, &config)
            .map_err(|source| HandlerError::Resolve {
                handler: name.to_string(),
                source,
            })?;

        tracing::trace!(handler = name, arguments = args.len(), "invoking entrypoint");

        self.entrypoint
            .invoke(args)
            .map_err(|source| HandlerError::Invoke {
                handler: name.to_string(),
                source,
            })
    }
}

impl<E: Invokable> RequestHandler for InvokableHandler<E> {
    fn handle(&self, request: Arc<Request>) -> Result<Response, HandlerError> {
        let value = self.invoke_entrypoint(request)?;
        into_response(self.entrypoint.name(), value)
    }
}

impl<E: Invokable> core::fmt::Debug for InvokableHandler<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InvokableHandler")
            .field("entrypoint", &self.entrypoint.name())
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn into_response(handler: &str, value: Value) -> Result<Response, HandlerError> {
    let actual = match &value {
        Value::Object(object) => match object.downcast::<Response>() {
            Some(response) => return Ok(Arc::unwrap_or_clone(response)),
            None => object.type_key().name().to_string(),
        },
        other => other.kind_name().to_string(),
    };

    tracing::warn!(handler, actual = %actual, "entrypoint did not return a response");
    Err(HandlerError::ContractViolation {
        handler: handler.to_string(),
        expected: core::any::type_name::<Response>(),
        actual,
    })
}
