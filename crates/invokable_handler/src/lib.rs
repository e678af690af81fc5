//! Request handlers with resolved entrypoint arguments.
//!
//! A handler is an [`Invokable`](invokable_params::Invokable) entrypoint that
//! returns a [`Response`]. [`InvokableHandler`] gathers request attributes,
//! objects attached to the request and the request itself into a resolution
//! pool, resolves the entrypoint's arguments against a service container and
//! calls it.
//!
//! # Example
//!
//! ```
//! use invokable_handler::prelude::*;
//! use std::sync::Arc;
//!
//! struct Clock {
//!     year: i64,
//! }
//!
//! #[derive(Default)]
//! struct ShowYear;
//!
//! #[entrypoint]
//! impl ShowYear {
//!     #[invoke]
//!     fn show(&self, clock: Arc<Clock>, #[default(0)] offset: i64) -> Response {
//!         Response::ok((clock.year + offset).to_string())
//!     }
//! }
//!
//! let container: Arc<dyn Container> = Arc::new(ServiceContainer::new().with(Clock { year: 1492 }));
//! let handler = HandlerFactory::new().create_default::<ShowYear>(container);
//!
//! let request = Arc::new(Request::get("/year").with_attribute("offset", "8"));
//! let response = handler.handle(request).unwrap();
//! assert_eq!(response.body(), "1500");
//! ```
//!
//! # Architecture
//!
//! - [`http`] — in-memory [`Request`] and [`Response`]
//! - [`handler`] — [`RequestHandler`] and [`InvokableHandler`]
//! - [`factory`] — [`HandlerFactory`] with per-container resolver caching
//! - [`registry`] — [`HandlerRegistry`] for dispatch by name
//! - [`config`] — [`HandlerConfig`]

pub mod config;
pub mod error;
pub mod factory;
pub mod handler;
pub mod http;
pub mod registry;

pub use config::HandlerConfig;
pub use error::HandlerError;
pub use factory::HandlerFactory;
pub use handler::{InvokableHandler, RequestHandler};
pub use http::{Request, Response};
pub use registry::HandlerRegistry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::HandlerConfig;
    pub use crate::error::HandlerError;
    pub use crate::factory::HandlerFactory;
    pub use crate::handler::{InvokableHandler, RequestHandler};
    pub use crate::http::{Request, Response};
    pub use crate::registry::HandlerRegistry;
    pub use invokable_params::prelude::*;
}
