//! Resolved argument lists and typed argument extraction.
//!
//! - [`ResolvedArguments`] — ordered values, one per descriptor
//! - [`ArgumentReader`] — pops typed arguments in declaration order
//! - [`FromArgument`] — strict conversion from [`Value`] to a Rust type

use crate::error::InvokeError;
use crate::value::{ObjectRef, Value};
use core::any::Any;
use indexmap::IndexMap;
use std::sync::Arc;

/// Ordered argument list produced by a single resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArguments {
    values: Vec<Value>,
}

impl ResolvedArguments {
    /// Creates an argument list from positional values.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the argument at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Iterates over the arguments in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Returns the positional values.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the list and returns the positional values.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }

    /// Creates a reader expecting exactly `arity` arguments.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::ArgumentCount`] if the list length differs.
    pub fn reader(self, arity: usize) -> Result<ArgumentReader, InvokeError> {
        if self.values.len() != arity {
            return Err(InvokeError::ArgumentCount {
                expected: arity,
                actual: self.values.len(),
            });
        }
        Ok(ArgumentReader {
            values: self.values.into_iter(),
        })
    }
}

impl From<Vec<Value>> for ResolvedArguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl IntoIterator for ResolvedArguments {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedArguments {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Sequential, typed access to a [`ResolvedArguments`] list.
///
/// Used by `#[entrypoint]`-generated code to convert each resolved value into
/// the Rust type of the corresponding parameter.
#[derive(Debug)]
pub struct ArgumentReader {
    values: std::vec::IntoIter<Value>,
}

impl ArgumentReader {
    /// Takes the next argument and converts it to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::InvalidArgument`] if the value does not convert,
    /// or [`InvokeError::ArgumentCount`] if the list is exhausted.
    pub fn next<T: FromArgument>(&mut self, name: &str) -> Result<T, InvokeError> {
        let value = self.values.next().ok_or(InvokeError::ArgumentCount {
            expected: 1,
            actual: 0,
        })?;
        let actual = value.kind_name();
        T::from_argument(value).ok_or_else(|| InvokeError::InvalidArgument {
            name: name.to_string(),
            expected: core::any::type_name::<T>(),
            actual,
        })
    }
}

/// Strict conversion of a resolved [`Value`] into a Rust parameter type.
///
/// Conversions never coerce between kinds beyond lossless widening
/// (integers into floats). `Null` only converts into `Option<T>` and
/// [`Value`] itself.
pub trait FromArgument: Sized {
    /// Converts the value, or returns `None` when it has the wrong shape.
    fn from_argument(value: Value) -> Option<Self>;
}

impl FromArgument for Value {
    fn from_argument(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromArgument for bool {
    fn from_argument(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! impl_from_argument_int {
    ($($ty:ty),*) => {
        $(
            impl FromArgument for $ty {
                fn from_argument(value: Value) -> Option<Self> {
                    value.as_int().and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

impl_from_argument_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromArgument for f64 {
    fn from_argument(value: Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(n),
            Value::Int(n) => Some(n as f64),
            _ => None,
        }
    }
}

impl FromArgument for f32 {
    fn from_argument(value: Value) -> Option<Self> {
        f64::from_argument(value).map(|n| n as f32)
    }
}

impl FromArgument for String {
    fn from_argument(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromArgument for Vec<Value> {
    fn from_argument(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl FromArgument for IndexMap<String, Value> {
    fn from_argument(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl FromArgument for ObjectRef {
    fn from_argument(value: Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl<T: Any + Send + Sync> FromArgument for Arc<T> {
    fn from_argument(value: Value) -> Option<Self> {
        value.downcast::<T>()
    }
}

impl<T: FromArgument> FromArgument for Option<T> {
    fn from_argument(value: Value) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_argument(value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Foo;

    #[test]
    fn reader_checks_arity() {
        let args = ResolvedArguments::new(vec![Value::Int(1)]);
        let err = args.reader(2).unwrap_err();
        assert_eq!(
            err,
            InvokeError::ArgumentCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn reader_converts_in_order() {
        let foo = Arc::new(Foo);
        let args = ResolvedArguments::new(vec![
            Value::Int(7),
            Value::Null,
            Value::from_arc(Arc::clone(&foo)),
            Value::Int(2),
        ]);
        let mut reader = args.reader(4).unwrap();

        let n: i32 = reader.next("n").unwrap();
        let title: Option<String> = reader.next("title").unwrap();
        let service: Arc<Foo> = reader.next("foo").unwrap();
        let ratio: f64 = reader.next("ratio").unwrap();

        assert_eq!(n, 7);
        assert_eq!(title, None);
        assert!(Arc::ptr_eq(&service, &foo));
        assert!((ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_is_rejected_for_required_scalars() {
        let args = ResolvedArguments::new(vec![Value::Null]);
        let mut reader = args.reader(1).unwrap();
        let err = reader.next::<i64>("product_id").unwrap_err();
        assert!(matches!(
            err,
            InvokeError::InvalidArgument { ref name, actual: "null", .. } if name == "product_id"
        ));
    }

    #[test]
    fn integer_narrowing_is_checked() {
        assert_eq!(u8::from_argument(Value::Int(300)), None);
        assert_eq!(u8::from_argument(Value::Int(30)), Some(30));
        assert_eq!(u32::from_argument(Value::Int(-1)), None);
    }
}
