//! Example product catalog served through invokable handlers.
//!
//! Each handler is a plain struct whose `#[invoke]` method declares what it
//! needs: the shared [`Catalog`] service comes from the container, while
//! `product_id`, `max_price` and friends come from request attributes and are
//! coerced from their string form.

use indexmap::IndexMap;
use invokable_handler::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by the demo binary.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Bad command line.
    #[error("usage: catalog <handler> [name=value ...] (handlers: {handlers})")]
    Usage {
        /// Comma-separated handler names.
        handlers: String,
    },

    /// An attribute argument is not of the form `name=value`.
    #[error("invalid attribute `{0}`, expected name=value")]
    InvalidAttribute(String),

    /// The configuration file could not be loaded.
    #[error("failed to load config from {path}: {message}")]
    Config {
        /// Path that was read.
        path: String,
        /// Reason.
        message: String,
    },

    /// The handler failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// Writing the response failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Level used when no filter is given.
    pub level: String,
    /// `EnvFilter` directives. Falls back to `RUST_LOG`, then `level`.
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
            filter: None,
        }
    }
}

/// Demo configuration, read from the JSON file named by
/// [`DemoConfig::ENV`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Resolver settings.
    pub resolver: ResolverConfig,
    /// Settings shared by all handlers.
    pub handler: HandlerConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl DemoConfig {
    /// Environment variable holding the config file path.
    pub const ENV: &'static str = "INVOKABLE_CONFIG";

    /// Parses a JSON document. Missing sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Config`] if the document is malformed.
    pub fn from_json(text: &str) -> Result<Self, DemoError> {
        serde_json::from_str(text).map_err(|err| DemoError::Config {
            path: "<inline>".to_string(),
            message: err.to_string(),
        })
    }

    /// Loads the file named by [`Self::ENV`], or the defaults if unset.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Config`] if the file cannot be read or parsed.
    pub fn from_env() -> Result<Self, DemoError> {
        let Ok(path) = std::env::var(Self::ENV) else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path).map_err(|err| DemoError::Config {
            path: path.clone(),
            message: err.to_string(),
        })?;
        Self::from_json(&text).map_err(|err| match err {
            DemoError::Config { message, .. } => DemoError::Config { path, message },
            other => other,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog service
// ─────────────────────────────────────────────────────────────────────────────

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: f64,
}

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    products: IndexMap<i64, Product>,
}

impl Catalog {
    /// A small fixed catalog.
    #[must_use]
    pub fn sample() -> Self {
        let products = [(1, "Notebook", 4.5), (2, "Fountain pen", 32.0), (3, "Ink, blue", 7.25)]
            .into_iter()
            .map(|(id, title, price)| {
                (
                    id,
                    Product {
                        id,
                        title: title.to_string(),
                        price,
                    },
                )
            })
            .collect();
        Self { products }
    }

    /// Looks up one product.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Products priced at or below `max_price`, in catalog order.
    pub fn cheaper_than(&self, max_price: Option<f64>) -> impl Iterator<Item = &Product> {
        self.products
            .values()
            .filter(move |p| max_price.is_none_or(|max| p.price <= max))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `show`: one product as JSON, or 404.
#[derive(Debug, Default)]
pub struct ShowProduct;

#[entrypoint]
impl ShowProduct {
    #[invoke]
    fn show(&self, catalog: Arc<Catalog>, product_id: i64) -> Response {
        match catalog.get(product_id) {
            Some(product) => Response::json(&serde_json::json!(product)),
            None => Response::json(&serde_json::json!({ "error": "not found", "id": product_id }))
                .with_status(404),
        }
    }
}

/// `list`: products under an optional price cap.
#[derive(Debug, Default)]
pub struct ListProducts;

#[entrypoint]
impl ListProducts {
    #[invoke]
    fn list(
        &self,
        catalog: Arc<Catalog>,
        #[default(None)] max_price: Option<f64>,
        #[default(10)] limit: i64,
    ) -> Response {
        let limit = usize::try_from(limit).unwrap_or(0);
        let products: Vec<_> = catalog.cheaper_than(max_price).take(limit).collect();
        Response::json(&serde_json::json!(products))
    }
}

/// `greet`: an HTML greeting that echoes the request path.
#[derive(Debug, Default)]
pub struct Greet;

#[entrypoint]
impl Greet {
    #[invoke]
    fn greet(&self, request: Arc<Request>, #[default(String::from("guest"))] name: String) -> Response {
        Response::html(format!("<p>Hello, {name}! You asked for {}</p>", request.path()))
    }
}

/// Builds the handler registry over a container holding the sample catalog.
#[must_use]
pub fn build_registry(config: &DemoConfig) -> HandlerRegistry {
    let container: Arc<dyn Container> = Arc::new(ServiceContainer::new().with(Catalog::sample()));
    let factory = HandlerFactory::new()
        .with_resolver_config(config.resolver)
        .with_handler_config(config.handler.clone());

    let mut registry = HandlerRegistry::new();
    registry.register("show", factory.create_default::<ShowProduct>(Arc::clone(&container)));
    registry.register("list", factory.create_default::<ListProducts>(Arc::clone(&container)));
    registry.register("greet", factory.create_default::<Greet>(container));
    registry
}

/// Parses `name=value` arguments into string attributes.
///
/// # Errors
///
/// Returns [`DemoError::InvalidAttribute`] for arguments without `=`.
pub fn parse_attributes<I>(args: I) -> Result<Vec<(String, Value)>, DemoError>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), Value::from(value))),
            _ => Err(DemoError::InvalidAttribute(arg)),
        })
        .collect()
}

/// Builds the request for `handler` with the given attributes.
#[must_use]
pub fn build_request(handler: &str, attributes: Vec<(String, Value)>) -> Request {
    Request::get(format!("/{handler}")).with_attributes(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str]) -> Response {
        let registry = build_registry(&DemoConfig::default());
        let attributes = parse_attributes(args.iter().map(ToString::to_string)).unwrap();
        registry
            .handle(name, Arc::new(build_request(name, attributes)))
            .unwrap()
    }

    #[test]
    fn show_coerces_the_product_id() {
        let response = call("show", &["product_id=2"]);
        assert_eq!(response.status(), 200);
        assert!(response.body().contains("Fountain pen"));

        assert_eq!(call("show", &["product_id=9"]).status(), 404);
    }

    #[test]
    fn list_applies_price_and_limit() {
        let response = call("list", &["max_price=10", "limit=1"]);
        let body: serde_json::Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["title"], "Notebook");
    }

    #[test]
    fn greet_uses_the_request() {
        let response = call("greet", &["name=ada"]);
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(response.body(), "<p>Hello, ada! You asked for /greet</p>");
    }

    #[test]
    fn missing_product_id_is_unresolved() {
        let registry = build_registry(&DemoConfig::default());
        let err = registry
            .handle("show", Arc::new(build_request("show", Vec::new())))
            .unwrap_err();
        assert!(matches!(err, HandlerError::Resolve { .. }));
    }

    #[test]
    fn attributes_need_a_name() {
        assert!(matches!(
            parse_attributes(["=1".to_string()]),
            Err(DemoError::InvalidAttribute(arg)) if arg == "=1"
        ));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = DemoConfig::from_json(
            r#"{ "handler": { "coerce_attributes": false }, "log": { "format": "json" } }"#,
        )
        .unwrap();
        assert!(!config.handler.coerce_attributes);
        assert!(config.resolver.coerce_scalars);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }
}
