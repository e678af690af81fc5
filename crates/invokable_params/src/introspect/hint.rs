//! Mapping from Rust parameter types to declared type hints.

use super::{Builtin, NamedType, TypeHint};
use crate::value::{ObjectRef, TypeKey, Value};
use core::any::Any;
use indexmap::IndexMap;
use std::sync::Arc;

/// Rust types that can appear as entrypoint parameters.
///
/// `#[entrypoint]` calls [`ParamType::type_hint`] for every parameter to build
/// the [`Signature`](super::Signature).
pub trait ParamType {
    /// The type hint this Rust type declares.
    fn type_hint() -> TypeHint;
}

macro_rules! impl_builtin {
    ($builtin:ident => $($ty:ty),*) => {
        $(
            impl ParamType for $ty {
                fn type_hint() -> TypeHint {
                    TypeHint::builtin(Builtin::$builtin)
                }
            }
        )*
    };
}

impl_builtin!(String => String);
impl_builtin!(Int => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_builtin!(Float => f32, f64);
impl_builtin!(Bool => bool);
impl_builtin!(Array => Vec<Value>, IndexMap<String, Value>);

impl ParamType for Value {
    fn type_hint() -> TypeHint {
        TypeHint::Untyped
    }
}

impl ParamType for ObjectRef {
    fn type_hint() -> TypeHint {
        TypeHint::Untyped
    }
}

impl<T: Any + Send + Sync> ParamType for Arc<T> {
    fn type_hint() -> TypeHint {
        TypeHint::class(TypeKey::of::<T>())
    }
}

impl<T: ParamType> ParamType for Option<T> {
    fn type_hint() -> TypeHint {
        match T::type_hint() {
            TypeHint::Untyped => TypeHint::Named {
                ty: NamedType::Builtin(Builtin::Mixed),
                nullable: true,
            },
            TypeHint::Named { ty, .. } => TypeHint::Named { ty, nullable: true },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mailer;

    #[test]
    fn scalars() {
        assert_eq!(u16::type_hint(), TypeHint::builtin(Builtin::Int));
        assert_eq!(f32::type_hint(), TypeHint::builtin(Builtin::Float));
        assert_eq!(String::type_hint(), TypeHint::builtin(Builtin::String));
        assert_eq!(
            <IndexMap<String, Value>>::type_hint(),
            TypeHint::builtin(Builtin::Array)
        );
    }

    #[test]
    fn option_makes_nullable() {
        assert_eq!(
            <Option<bool>>::type_hint(),
            TypeHint::Named {
                ty: NamedType::Builtin(Builtin::Bool),
                nullable: true
            }
        );
        assert_eq!(
            <Option<Value>>::type_hint(),
            TypeHint::Named {
                ty: NamedType::Builtin(Builtin::Mixed),
                nullable: true
            }
        );
    }

    #[test]
    fn shared_objects_are_classes() {
        assert_eq!(
            <Arc<Mailer>>::type_hint(),
            TypeHint::class(TypeKey::of::<Mailer>())
        );
    }
}
