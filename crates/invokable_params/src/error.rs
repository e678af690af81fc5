//! Error types for introspection, resolution, container lookups and
//! invocation.

use thiserror::Error;

/// Errors raised while extracting a parameter list from an entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    /// The entrypoint does not implement its invocation member.
    #[error("entrypoint `{entrypoint}` has no invocation member")]
    MissingEntrypoint {
        /// Name of the entrypoint type.
        entrypoint: String,
    },

    /// A parameter was declared with an empty name.
    #[error("parameter at position {position} has an empty name")]
    InvalidName {
        /// Declaration position of the parameter.
        position: usize,
    },

    /// Two parameters share the same name.
    #[error("parameter `{name}` is declared more than once")]
    DuplicateParameter {
        /// The duplicated name.
        name: String,
    },

    /// A variadic parameter was declared.
    #[error("variadic parameter `{name}` is not supported")]
    Variadic {
        /// Name of the variadic parameter.
        name: String,
    },

    /// The parameter's type annotation cannot be mapped to a declared kind.
    #[error("parameter `{name}` has an unsupported type annotation: {hint}")]
    UnsupportedType {
        /// Name of the parameter.
        name: String,
        /// Rendered annotation.
        hint: String,
    },
}

impl IntrospectionError {
    /// Creates a [`MissingEntrypoint`](Self::MissingEntrypoint).
    pub fn missing_entrypoint(entrypoint: impl Into<String>) -> Self {
        Self::MissingEntrypoint {
            entrypoint: entrypoint.into(),
        }
    }
}

/// Errors raised by a [`Container`](crate::container::Container).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// No service is registered under the key.
    #[error("service not found: {0}")]
    NotFound(String),

    /// A lazy service factory failed.
    #[error("factory for `{key}` failed: {message}")]
    Factory {
        /// The service key.
        key: String,
        /// Failure description.
        message: String,
    },
}

impl ContainerError {
    /// Creates a [`Factory`](Self::Factory) error.
    pub fn factory(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Factory {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while resolving an argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The entrypoint's parameter list could not be extracted.
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    /// A required parameter has no source.
    #[error("unable to resolve parameter `{name}` at position {position}")]
    UnresolvedParameter {
        /// Parameter name.
        name: String,
        /// Parameter position.
        position: usize,
    },

    /// The container reported a service but failed to produce it.
    #[error("container failed to provide parameter `{parameter}`: {source}")]
    Container {
        /// Parameter being resolved.
        parameter: String,
        /// Underlying container error.
        source: ContainerError,
    },
}

/// Errors raised when calling an entrypoint with resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// The argument list does not match the declared arity.
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument could not be converted to the parameter's Rust type.
    #[error("argument `{name}` expects {expected}, got {actual}")]
    InvalidArgument {
        /// Parameter name.
        name: String,
        /// Expected Rust type.
        expected: &'static str,
        /// Kind of the supplied value.
        actual: &'static str,
    },

    /// The entrypoint body failed.
    #[error("execution error: {0}")]
    Execution(String),
}

impl InvokeError {
    /// Creates an [`Execution`](Self::Execution) error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}
