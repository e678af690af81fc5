//! Argument resolution for invokable entrypoints.
//!
//! - [`invokable_params`] computes argument lists from attribute pools, type
//!   overrides and a service container.
//! - [`invokable_handler`] wraps entrypoints as request handlers.

pub use invokable_handler;
pub use invokable_params;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use invokable_handler::prelude::*;
}
