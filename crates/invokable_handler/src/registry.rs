//! Named handler registry.

use crate::error::HandlerError;
use crate::handler::RequestHandler;
use crate::http::{Request, Response};
use indexmap::IndexMap;
use std::sync::Arc;

/// Handlers stored by name, in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, Arc<dyn RequestHandler>>,
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Registers a handler.
    ///
    /// # Panics
    ///
    /// Panics if a handler with the same name is already registered.
    pub fn register(&mut self, name: impl Into<String>, handler: impl RequestHandler) {
        self.register_arc(name, Arc::new(handler));
    }

    /// Registers a shared handler.
    ///
    /// # Panics
    ///
    /// Panics if a handler with the same name is already registered.
    pub fn register_arc(&mut self, name: impl Into<String>, handler: Arc<dyn RequestHandler>) {
        let name = name.into();
        assert!(
            !self.handlers.contains_key(&name),
            "Handler '{name}' is already registered"
        );
        self.handlers.insert(name, handler);
    }

    /// Returns a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn RequestHandler>> {
        self.handlers.get(name)
    }

    /// Returns `true` if a handler with the given name exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the names of all registered handlers.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatches `request` to the named handler.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::UnknownHandler`] if no handler has that name,
    /// otherwise whatever the handler returns.
    pub fn handle(&self, name: &str, request: Arc<Request>) -> Result<Response, HandlerError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| HandlerError::UnknownHandler(name.to_string()))?;
        tracing::debug!(handler = name, method = request.method(), path = request.path(), "dispatching request");
        handler.handle(request)
    }
}
