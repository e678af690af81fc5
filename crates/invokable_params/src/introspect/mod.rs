//! Entrypoint introspection.
//!
//! Rust has no runtime reflection over function parameters, so an entrypoint
//! describes its own parameter list through a [`Signature`]: the explicit
//! descriptor table. [`introspect`] validates the table and normalizes it into
//! [`ParameterDescriptor`]s.
//!
//! Signatures are usually generated by [`#[entrypoint]`](crate::entrypoint),
//! but they can be written by hand:
//!
//! ```
//! use invokable_params::introspect::{Builtin, DeclaredParam, Signature, TypeHint};
//! use invokable_params::value::Value;
//!
//! let signature = Signature::new()
//!     .param(DeclaredParam::new("customer_id", TypeHint::nullable(Builtin::Int))
//!         .with_default(Value::Null))
//!     .param(DeclaredParam::new("slug", TypeHint::builtin(Builtin::String))
//!         .with_default(""));
//!
//! let descriptors = signature.descriptors().unwrap();
//! assert_eq!(descriptors[1].name(), "slug");
//! assert_eq!(descriptors[1].position(), 1);
//! ```

mod hint;

pub use hint::ParamType;

use crate::argument::ResolvedArguments;
use crate::descriptor::{DeclaredKind, ParameterDescriptor};
use crate::error::{IntrospectionError, InvokeError};
use crate::value::{TypeKey, Value};
use core::fmt;
use hashbrown::HashSet;

// ─────────────────────────────────────────────────────────────────────────────
// Invokable
// ─────────────────────────────────────────────────────────────────────────────

/// An object with a single parameterized invocation member.
///
/// [`signature`](Invokable::signature) returns `None` when the object does not
/// expose an invocation member; introspection then fails with
/// [`IntrospectionError::MissingEntrypoint`].
pub trait Invokable: Send + Sync + 'static {
    /// The declared parameter list, or `None` if there is no invocation member.
    fn signature(&self) -> Option<Signature>;

    /// Invokes the entrypoint with arguments resolved against its signature.
    fn invoke(&self, args: ResolvedArguments) -> Result<Value, InvokeError>;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Extracts the ordered parameter descriptors of an entrypoint.
///
/// # Errors
///
/// Returns [`IntrospectionError::MissingEntrypoint`] if the entrypoint has no
/// invocation member, or any validation error from
/// [`Signature::descriptors`].
pub fn introspect(entrypoint: &dyn Invokable) -> Result<Vec<ParameterDescriptor>, IntrospectionError> {
    entrypoint
        .signature()
        .ok_or_else(|| IntrospectionError::missing_entrypoint(entrypoint.name()))?
        .descriptors()
}

// ─────────────────────────────────────────────────────────────────────────────
// Type hints
// ─────────────────────────────────────────────────────────────────────────────

/// Built-in type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `string`
    String,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `array`, an aggregate.
    Array,
    /// `mixed`, any value.
    Mixed,
}

impl Builtin {
    fn declared_kind(self) -> DeclaredKind {
        match self {
            Self::String => DeclaredKind::String,
            Self::Int => DeclaredKind::Int,
            Self::Float => DeclaredKind::Float,
            Self::Bool => DeclaredKind::Bool,
            Self::Array => DeclaredKind::Array,
            Self::Mixed => DeclaredKind::None,
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Mixed => "mixed",
        })
    }
}

/// A single named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedType {
    /// A built-in type.
    Builtin(Builtin),
    /// A Rust type, resolved from overrides and the container.
    Class(TypeKey),
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => fmt::Display::fmt(builtin, f),
            Self::Class(key) => fmt::Display::fmt(key, f),
        }
    }
}

/// The declared type annotation of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// No annotation.
    Untyped,
    /// Exactly one named type, optionally nullable.
    Named {
        /// The type.
        ty: NamedType,
        /// Whether the annotation admits null.
        nullable: bool,
    },
    /// `A|B`. Not supported by the resolver.
    Union(Vec<NamedType>),
    /// `A&B`. Not supported by the resolver.
    Intersection(Vec<NamedType>),
}

impl TypeHint {
    /// A non-nullable built-in type.
    #[must_use]
    pub fn builtin(builtin: Builtin) -> Self {
        Self::Named {
            ty: NamedType::Builtin(builtin),
            nullable: false,
        }
    }

    /// A nullable built-in type.
    #[must_use]
    pub fn nullable(builtin: Builtin) -> Self {
        Self::Named {
            ty: NamedType::Builtin(builtin),
            nullable: true,
        }
    }

    /// A non-nullable class type.
    #[must_use]
    pub fn class(key: TypeKey) -> Self {
        Self::Named {
            ty: NamedType::Class(key),
            nullable: false,
        }
    }

    /// A class type for `T`.
    #[must_use]
    pub fn class_of<T: ?Sized + 'static>() -> Self {
        Self::class(TypeKey::of::<T>())
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[NamedType], sep: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        fmt::Display::fmt(ty, f)?;
    }
    Ok(())
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untyped => f.write_str("untyped"),
            Self::Named { ty, nullable: true } => write!(f, "?{ty}"),
            Self::Named { ty, nullable: false } => fmt::Display::fmt(ty, f),
            Self::Union(types) => write_joined(f, types, "|"),
            Self::Intersection(types) => write_joined(f, types, "&"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Signature
// ─────────────────────────────────────────────────────────────────────────────

/// One declared parameter in a [`Signature`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredParam {
    name: String,
    hint: TypeHint,
    default: Option<Value>,
    variadic: bool,
}

impl DeclaredParam {
    /// Declares a parameter with an explicit type hint.
    pub fn new(name: impl Into<String>, hint: TypeHint) -> Self {
        Self {
            name: name.into(),
            hint,
            default: None,
            variadic: false,
        }
    }

    /// Declares a parameter without a type annotation.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::Untyped)
    }

    /// Declares a parameter whose hint comes from the Rust type `T`.
    pub fn of<T: ParamType>(name: impl Into<String>) -> Self {
        Self::new(name, T::type_hint())
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the parameter as variadic.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type hint.
    #[must_use]
    pub fn hint(&self) -> &TypeHint {
        &self.hint
    }

    /// Declared default.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the parameter is variadic.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    fn to_descriptor(&self, position: usize) -> Result<ParameterDescriptor, IntrospectionError> {
        if self.name.is_empty() {
            return Err(IntrospectionError::InvalidName { position });
        }
        if self.variadic {
            return Err(IntrospectionError::Variadic {
                name: self.name.clone(),
            });
        }

        let (kind, nullable) = match &self.hint {
            TypeHint::Untyped => (DeclaredKind::None, false),
            TypeHint::Named { ty, nullable } => {
                let kind = match ty {
                    NamedType::Builtin(builtin) => builtin.declared_kind(),
                    NamedType::Class(key) => DeclaredKind::Object(*key),
                };
                (kind, *nullable)
            }
            hint @ (TypeHint::Union(_) | TypeHint::Intersection(_)) => {
                return Err(IntrospectionError::UnsupportedType {
                    name: self.name.clone(),
                    hint: hint.to_string(),
                });
            }
        };

        let descriptor = ParameterDescriptor::new(self.name.clone(), position, kind).nullable(nullable);
        Ok(match &self.default {
            Some(default) => descriptor.with_default(default.clone()),
            None => descriptor,
        })
    }
}

/// The explicit descriptor table of an entrypoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<DeclaredParam>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: DeclaredParam) -> Self {
        self.params.push(param);
        self
    }

    /// Appends a parameter in place.
    pub fn push(&mut self, param: DeclaredParam) {
        self.params.push(param);
    }

    /// Declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[DeclaredParam] {
        &self.params
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no parameters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validates the table and produces descriptors in declaration order.
    ///
    /// # Errors
    ///
    /// - [`IntrospectionError::InvalidName`] for an empty name
    /// - [`IntrospectionError::DuplicateParameter`] for a repeated name
    /// - [`IntrospectionError::Variadic`] for a variadic parameter
    /// - [`IntrospectionError::UnsupportedType`] for union and intersection hints
    pub fn descriptors(&self) -> Result<Vec<ParameterDescriptor>, IntrospectionError> {
        let mut seen = HashSet::with_capacity(self.params.len());
        self.params
            .iter()
            .enumerate()
            .map(|(position, param)| {
                let descriptor = param.to_descriptor(position)?;
                if !seen.insert(param.name.as_str()) {
                    return Err(IntrospectionError::DuplicateParameter {
                        name: param.name.clone(),
                    });
                }
                Ok(descriptor)
            })
            .collect()
    }
}

impl FromIterator<DeclaredParam> for Signature {
    fn from_iter<I: IntoIterator<Item = DeclaredParam>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}
