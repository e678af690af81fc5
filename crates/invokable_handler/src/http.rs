//! In-memory request and response values.
//!
//! There is no transport here: a [`Request`] is a method, a path and a bag of
//! attributes (route parameters, parsed query values, objects placed by
//! middleware). A [`Response`] is a status, headers and a text body.

use core::any::Any;
use indexmap::IndexMap;
use invokable_params::value::Value;
use serde::Serialize;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// An incoming request.
///
/// ```
/// use invokable_handler::Request;
/// use invokable_params::Value;
///
/// let request = Request::get("/products/42")
///     .with_attribute("product_id", "42")
///     .with_attribute("preview", true);
///
/// assert_eq!(request.attribute("product_id"), Some(&Value::from("42")));
/// assert_eq!(request.attributes().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    path: String,
    attributes: IndexMap<String, Value>,
}

impl Request {
    /// Creates a request without attributes.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets several attributes.
    #[must_use]
    pub fn with_attributes<K, I>(mut self, attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Attaches an object under its type name.
    ///
    /// Objects attached this way shadow container services of the same type
    /// when the request is handled.
    #[must_use]
    pub fn with_object<T: Any + Send + Sync>(self, object: Arc<T>) -> Self {
        self.with_attribute(core::any::type_name::<T>(), Value::from_arc(object))
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns one attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns all attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// An outgoing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    status: u16,
    headers: IndexMap<String, String>,
    body: String,
}

impl Response {
    /// A `200 OK` plain-text response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: IndexMap::from([(
                "content-type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )]),
            body: body.into(),
        }
    }

    /// A `200 OK` HTML response.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok(body).with_header("content-type", "text/html; charset=utf-8")
    }

    /// A `200 OK` JSON response.
    #[must_use]
    pub fn json(body: &serde_json::Value) -> Self {
        Self::ok(body.to_string()).with_header("content-type", "application/json")
    }

    /// Sets the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets a header, replacing any previous value. Names are lowercased.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns one header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        Value::object(response)
    }
}
