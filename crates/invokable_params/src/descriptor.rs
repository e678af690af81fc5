//! Parameter descriptors.
//!
//! A [`ParameterDescriptor`] is the normalized, immutable view of one
//! declared parameter: its name, position, [`DeclaredKind`], nullability and
//! default. Descriptors are produced by
//! [`introspect`](crate::introspect::introspect) and consumed by the resolver.

use crate::value::{TypeKey, Value};
use core::fmt;

/// The four scalar kinds that support coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text.
    String,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
}

impl ScalarKind {
    /// Returns the lowercase kind name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind a parameter declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredKind {
    /// No type annotation; values are used as-is.
    None,
    /// A string scalar.
    String,
    /// An integer scalar.
    Int,
    /// A float scalar.
    Float,
    /// A boolean scalar.
    Bool,
    /// An aggregate. Never coerced.
    Array,
    /// An object of the given type, resolvable from overrides and the container.
    Object(TypeKey),
}

impl DeclaredKind {
    /// Returns the scalar kind, if this is one of the four scalar kinds.
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::String => Some(ScalarKind::String),
            Self::Int => Some(ScalarKind::Int),
            Self::Float => Some(ScalarKind::Float),
            Self::Bool => Some(ScalarKind::Bool),
            Self::None | Self::Array | Self::Object(_) => None,
        }
    }

    /// Returns `true` for the four scalar kinds.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.scalar().is_some()
    }

    /// Returns the object type, if this is an object kind.
    #[must_use]
    pub fn object_type(&self) -> Option<TypeKey> {
        match self {
            Self::Object(key) => Some(*key),
            _ => None,
        }
    }
}

impl From<ScalarKind> for DeclaredKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Int => Self::Int,
            ScalarKind::Float => Self::Float,
            ScalarKind::Bool => Self::Bool,
        }
    }
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Array => f.write_str("array"),
            Self::Object(key) => write!(f, "object({key})"),
        }
    }
}

/// Normalized description of one entrypoint parameter.
///
/// Descriptors are built once per entrypoint and shared read-only between
/// resolutions.
///
/// # Example
///
/// ```
/// use invokable_params::descriptor::{DeclaredKind, ParameterDescriptor};
/// use invokable_params::value::Value;
///
/// let customer = ParameterDescriptor::new("customer_id", 1, DeclaredKind::Int)
///     .with_default(Value::Null);
///
/// assert!(customer.is_nullable());
/// assert!(customer.has_default());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    position: usize,
    kind: DeclaredKind,
    nullable: bool,
    default: Option<Value>,
}

impl ParameterDescriptor {
    /// Creates a required, non-nullable descriptor.
    pub fn new(name: impl Into<String>, position: usize, kind: DeclaredKind) -> Self {
        Self {
            name: name.into(),
            position,
            kind,
            nullable: false,
            default: None,
        }
    }

    /// Marks the parameter as accepting null.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable || matches!(self.default, Some(Value::Null));
        self
    }

    /// Declares a default value. A null default also makes the parameter nullable.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        if default.is_null() {
            self.nullable = true;
        }
        self.default = Some(default);
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based declaration position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Declared kind.
    #[must_use]
    pub fn declared_kind(&self) -> &DeclaredKind {
        &self.kind
    }

    /// Whether null is an acceptable value.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether a default value is declared.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The declared default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}
