//! Parameter resolution for invokable entrypoints.
//!
//! Given an entrypoint with a fixed parameter list and a pool of candidate
//! values, `invokable_params` computes the ordered argument list needed to
//! call it. Values come from request-style attributes, type-keyed overrides
//! and a service container, with optional scalar coercion.
//!
//! # Quick Start
//!
//! ```
//! use invokable_params::prelude::*;
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! #[entrypoint]
//! impl Greeter {
//!     #[invoke]
//!     fn greet(&self, name: String, #[default(1)] times: i64) -> String {
//!         name.repeat(times as usize)
//!     }
//! }
//!
//! let resolver = ParamsResolver::new(Arc::new(ServiceContainer::new()));
//! let pool = ResolutionPool::from_attributes([
//!     ("name", Value::from("ab")),
//!     ("times", Value::from("2")),
//! ]);
//!
//! let args = resolver.resolve_entrypoint(&Greeter, &pool).unwrap();
//! let out = Greeter.invoke(args).unwrap();
//! assert_eq!(out, Value::from("abab"));
//! ```
//!
//! # Architecture
//!
//! - [`value`] — dynamic [`Value`]s and type keys
//! - [`introspect`] — the [`Invokable`] trait and explicit [`Signature`]s
//! - [`descriptor`] — normalized [`ParameterDescriptor`]s
//! - [`coerce`] — scalar coercion
//! - [`pool`] — the per-call [`ResolutionPool`]
//! - [`container`] — the [`Container`] capability and [`ServiceContainer`]
//! - [`resolver`] — the resolution algorithm and [`ParamsResolver`]
//! - [`argument`] — [`ResolvedArguments`] and typed extraction

// Self-reference so `#[entrypoint]` output can use `invokable_params::` paths
// within this crate.
extern crate self as invokable_params;

pub mod argument;
pub mod coerce;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod pool;
pub mod resolver;
pub mod value;

pub use argument::{ArgumentReader, FromArgument, ResolvedArguments};
pub use container::{Container, ContainerId, ServiceContainer, ServiceKey};
pub use descriptor::{DeclaredKind, ParameterDescriptor, ScalarKind};
pub use error::{ContainerError, IntrospectionError, InvokeError, ResolveError};
pub use introspect::{
    Builtin, DeclaredParam, Invokable, NamedType, ParamType, Signature, TypeHint, introspect,
};
pub use pool::{PoolBuilder, ResolutionPool};
pub use resolver::{ParamsResolver, ResolverConfig, resolve};
pub use value::{ObjectRef, TypeKey, Value};

/// Re-export the `#[entrypoint]` attribute macro.
pub use invokable_macros::entrypoint;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::argument::*;
    pub use crate::container::*;
    pub use crate::descriptor::*;
    pub use crate::entrypoint;
    pub use crate::error::*;
    pub use crate::introspect::*;
    pub use crate::pool::*;
    pub use crate::resolver::{ParamsResolver, ResolverConfig};
    pub use crate::value::*;
}
