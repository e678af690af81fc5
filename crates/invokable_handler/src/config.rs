//! Handler configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-handler options.
///
/// ```
/// use invokable_handler::HandlerConfig;
///
/// let config: HandlerConfig = serde_json::from_str(
///     r#"{ "attribute_aliases": { "_route_id": "id" } }"#,
/// ).unwrap();
///
/// assert!(config.coerce_attributes);
/// assert_eq!(config.attribute_aliases["_route_id"], "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Coerce request attributes to the declared scalar parameter kinds.
    pub coerce_attributes: bool,
    /// Attribute name to parameter name. An aliased attribute is also offered
    /// under the parameter name unless the request already has that name.
    pub attribute_aliases: IndexMap<String, String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            coerce_attributes: true,
            attribute_aliases: IndexMap::new(),
        }
    }
}

impl HandlerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables attribute coercion.
    #[must_use]
    pub fn with_coerce_attributes(mut self, enabled: bool) -> Self {
        self.coerce_attributes = enabled;
        self
    }

    /// Offers `attribute` to the entrypoint under `parameter` as well.
    #[must_use]
    pub fn with_alias(mut self, attribute: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.attribute_aliases
            .insert(attribute.into(), parameter.into());
        self
    }
}
