//! Error types for request handling.

use invokable_params::error::{IntrospectionError, InvokeError, ResolveError};
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler's entrypoint has no invocation member.
    #[error("handler `{handler}` does not define an invocation member")]
    MissingEntrypoint {
        /// Handler name.
        handler: String,
    },

    /// The entrypoint's descriptor table is malformed.
    #[error("handler `{handler}` has an invalid signature: {source}")]
    Introspection {
        /// Handler name.
        handler: String,
        /// Underlying error.
        source: IntrospectionError,
    },

    /// Arguments could not be resolved.
    #[error("unable to resolve arguments for handler `{handler}`: {source}")]
    Resolve {
        /// Handler name.
        handler: String,
        /// Underlying error.
        source: ResolveError,
    },

    /// The entrypoint rejected its arguments or failed.
    #[error("handler `{handler}` failed: {source}")]
    Invoke {
        /// Handler name.
        handler: String,
        /// Underlying error.
        source: InvokeError,
    },

    /// The entrypoint returned something other than a response.
    #[error("handler `{handler}` must return {expected}, got {actual}")]
    ContractViolation {
        /// Handler name.
        handler: String,
        /// Expected result type.
        expected: &'static str,
        /// What was returned instead.
        actual: String,
    },

    /// No handler is registered under the name.
    #[error("unknown handler: {0}")]
    UnknownHandler(String),
}

impl HandlerError {
    /// Returns `true` for errors that break the handler contract: a missing
    /// invocation member or a result of the wrong shape.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingEntrypoint { .. } | Self::ContractViolation { .. }
        )
    }

    /// Builds the error for a failed introspection.
    pub(crate) fn introspection(handler: &str, source: IntrospectionError) -> Self {
        match source {
            IntrospectionError::MissingEntrypoint { .. } => Self::MissingEntrypoint {
                handler: handler.to_string(),
            },
            source => Self::Introspection {
                handler: handler.to_string(),
                source,
            },
        }
    }
}
