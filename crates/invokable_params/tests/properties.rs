//! Property-based tests for coercion and resolution.

use invokable_params::coerce::coerce;
use invokable_params::prelude::*;
use invokable_params::resolve;
use proptest::prelude::*;

struct Service;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e12f64..1.0e12f64).prop_map(Value::Float),
        "[ a-zA-Z0-9.+-]{0,10}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..4).prop_map(Value::Array),
    ]
}

fn arb_kind() -> impl Strategy<Value = ScalarKind> {
    prop_oneof![
        Just(ScalarKind::String),
        Just(ScalarKind::Int),
        Just(ScalarKind::Float),
        Just(ScalarKind::Bool),
    ]
}

proptest! {
    /// Coercing an already coerced value changes nothing.
    #[test]
    fn coercion_is_idempotent(kind in arb_kind(), value in arb_value()) {
        if let Some(once) = coerce(kind, &value) {
            prop_assert_eq!(coerce(kind, &once), Some(once.clone()));
        }
    }

    /// Native values of the target kind are returned unchanged.
    #[test]
    fn native_values_are_fixed_points(n in any::<i64>(), b in any::<bool>(), text in ".{0,12}") {
        prop_assert_eq!(coerce(ScalarKind::Int, &Value::Int(n)), Some(Value::Int(n)));
        prop_assert_eq!(coerce(ScalarKind::Bool, &Value::Bool(b)), Some(Value::Bool(b)));
        prop_assert_eq!(
            coerce(ScalarKind::String, &Value::String(text.clone())),
            Some(Value::String(text))
        );
    }

    /// Decimal integer text always coerces to the integer it spells.
    #[test]
    fn integer_text_round_trips(n in any::<i64>()) {
        prop_assert_eq!(coerce(ScalarKind::Int, &Value::String(n.to_string())), Some(Value::Int(n)));
    }

    /// Untyped and object parameters receive pool values verbatim.
    #[test]
    fn uncoerced_kinds_pass_raw_values(value in arb_value(), object in any::<bool>()) {
        let kind = if object {
            DeclaredKind::Object(TypeKey::of::<Service>())
        } else {
            DeclaredKind::None
        };
        let descriptors = [ParameterDescriptor::new("p", 0, kind)];
        let pool = ResolutionPool::from_attributes([("p", value.clone())]);

        let args = resolve(&descriptors, &pool, &ServiceContainer::new(), &ResolverConfig::default())
            .unwrap();
        prop_assert_eq!(args.get(0), Some(&value));
    }

    /// One argument per descriptor, in descriptor order.
    #[test]
    fn one_argument_per_descriptor(present in prop::collection::vec(any::<bool>(), 0..12)) {
        let descriptors: Vec<_> = (0..present.len())
            .map(|i| {
                ParameterDescriptor::new(format!("p{i}"), i, DeclaredKind::Int)
                    .with_default(Value::Int(-1))
            })
            .collect();
        let pool = ResolutionPool::from_attributes(
            present
                .iter()
                .enumerate()
                .filter(|(_, present)| **present)
                .map(|(i, _)| (format!("p{i}"), Value::from(i.to_string()))),
        );

        let args = resolve(&descriptors, &pool, &ServiceContainer::new(), &ResolverConfig::default())
            .unwrap();
        prop_assert_eq!(args.len(), descriptors.len());
        for (i, arg) in args.iter().enumerate() {
            let expected = if present[i] { i64::try_from(i).unwrap() } else { -1 };
            prop_assert_eq!(arg, &Value::Int(expected));
        }
    }

    /// A type-keyed override wins whether or not the container has the type.
    #[test]
    fn overrides_always_win(registered in any::<bool>()) {
        let mut container = ServiceContainer::new();
        if registered {
            container.insert(Service);
        }
        let preferred = std::sync::Arc::new(Service);
        let pool = ResolutionPool::builder()
            .with_object(std::sync::Arc::clone(&preferred))
            .build();
        let descriptors = [ParameterDescriptor::new(
            "service",
            0,
            DeclaredKind::Object(TypeKey::of::<Service>()),
        )];

        let args = resolve(&descriptors, &pool, &container, &ResolverConfig::default()).unwrap();
        let resolved = args.get(0).and_then(Value::downcast::<Service>).unwrap();
        prop_assert!(std::sync::Arc::ptr_eq(&resolved, &preferred));
    }
}
