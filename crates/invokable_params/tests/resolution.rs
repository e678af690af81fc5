//! Integration tests for source precedence during resolution.

use invokable_params::prelude::*;
use invokable_params::resolve;
use std::sync::Arc;

struct Clock {
    label: &'static str,
}

fn object_param(name: &str, position: usize) -> ParameterDescriptor {
    ParameterDescriptor::new(name, position, DeclaredKind::Object(TypeKey::of::<Clock>()))
}

fn resolve_one(
    descriptor: ParameterDescriptor,
    pool: &ResolutionPool,
    container: &ServiceContainer,
) -> Result<Value, ResolveError> {
    let args = resolve(&[descriptor], pool, container, &ResolverConfig::default())?;
    assert_eq!(args.len(), 1);
    Ok(args.into_vec().remove(0))
}

fn clock_label(value: &Value) -> &'static str {
    value.downcast::<Clock>().map(|clock| clock.label).unwrap_or("<none>")
}

// ─────────────────────────────────────────────────────────────────────────────
// Object parameters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn type_override_beats_container() {
    let container = ServiceContainer::new().with(Clock { label: "container" });
    let pool = ResolutionPool::builder()
        .with_object(Arc::new(Clock { label: "override" }))
        .build();

    let value = resolve_one(object_param("clock", 0), &pool, &container).unwrap();
    assert_eq!(clock_label(&value), "override");
}

#[test]
fn container_by_type_beats_named_pool() {
    let container = ServiceContainer::new().with(Clock { label: "container" });
    let pool = ResolutionPool::builder()
        .with_named("clock", Value::object(Clock { label: "named" }))
        .build();

    let value = resolve_one(object_param("clock", 0), &pool, &container).unwrap();
    assert_eq!(clock_label(&value), "container");
}

#[test]
fn null_override_is_ignored() {
    let container = ServiceContainer::new().with(Clock { label: "container" });
    let pool = ResolutionPool::builder()
        .with_override(TypeKey::of::<Clock>(), Value::Null)
        .build();

    let value = resolve_one(object_param("clock", 0), &pool, &container).unwrap();
    assert_eq!(clock_label(&value), "container");
}

#[test]
fn object_falls_through_to_named_pool() {
    let pool = ResolutionPool::builder()
        .with_named("clock", Value::object(Clock { label: "named" }))
        .build();

    let value = resolve_one(object_param("clock", 0), &pool, &ServiceContainer::new()).unwrap();
    assert_eq!(clock_label(&value), "named");
}

#[test]
fn missing_service_is_unresolved() {
    let err = resolve_one(
        object_param("clock", 3),
        &ResolutionPool::new(),
        &ServiceContainer::new(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ResolveError::UnresolvedParameter {
            name: "clock".into(),
            position: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "unable to resolve parameter `clock` at position 3"
    );
}

#[test]
fn null_service_is_unresolved() {
    let mut container = ServiceContainer::new();
    container.insert_value(ServiceKey::of::<Clock>(), Value::Null);

    let err = resolve_one(object_param("clock", 0), &ResolutionPool::new(), &container);
    assert!(matches!(err, Err(ResolveError::UnresolvedParameter { .. })));
}

// ─────────────────────────────────────────────────────────────────────────────
// Named parameters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn named_pool_beats_container_by_name() {
    let container = ServiceContainer::new().with_named("year", 1970);
    let pool = ResolutionPool::from_attributes([("year", Value::from("1492"))]);

    let descriptor = ParameterDescriptor::new("year", 0, DeclaredKind::Int);
    assert_eq!(resolve_one(descriptor, &pool, &container).unwrap(), Value::Int(1492));
}

#[test]
fn container_by_name_beats_default() {
    let container = ServiceContainer::new().with_named("year", 1492);

    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(1970));
    assert_eq!(
        resolve_one(descriptor, &ResolutionPool::new(), &container).unwrap(),
        Value::Int(1492)
    );
}

#[test]
fn container_values_are_not_coerced() {
    let container = ServiceContainer::new().with_named("year", "1492");

    let descriptor = ParameterDescriptor::new("year", 0, DeclaredKind::Int);
    assert_eq!(
        resolve_one(descriptor, &ResolutionPool::new(), &container).unwrap(),
        Value::from("1492")
    );
}

#[test]
fn null_container_value_uses_default() {
    let container = ServiceContainer::new().with_named("year", Value::Null);

    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(1970));
    assert_eq!(
        resolve_one(descriptor, &ResolutionPool::new(), &container).unwrap(),
        Value::Int(1970)
    );
}

#[test]
fn null_pool_entry_skips_to_default() {
    let pool = ResolutionPool::from_attributes([("year", Value::Null)]);
    let container = ServiceContainer::new().with_named("year", 1492);

    // The container is consulted after a null pool entry, before the default.
    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(1970));
    assert_eq!(resolve_one(descriptor, &pool, &container).unwrap(), Value::Int(1492));

    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(1970));
    assert_eq!(
        resolve_one(descriptor, &pool, &ServiceContainer::new()).unwrap(),
        Value::Int(1970)
    );
}

#[test]
fn coercion_failure_stops_the_chain() {
    let pool = ResolutionPool::from_attributes([("flag", Value::from("maybe"))]);
    let container = ServiceContainer::new().with_named("flag", false);

    let with_default =
        ParameterDescriptor::new("flag", 0, DeclaredKind::Bool).with_default(Value::Bool(true));
    assert_eq!(resolve_one(with_default, &pool, &container).unwrap(), Value::Bool(true));

    // No default: null, even though the parameter is not nullable.
    let required = ParameterDescriptor::new("flag", 0, DeclaredKind::Bool);
    assert_eq!(resolve_one(required, &pool, &container).unwrap(), Value::Null);
}

#[test]
fn blank_text_is_not_a_number() {
    let pool = ResolutionPool::from_attributes([("year", Value::from("  "))]);
    let container = ServiceContainer::new().with_named("year", 1492);

    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(99));
    assert_eq!(resolve_one(descriptor, &pool, &container).unwrap(), Value::Int(99));

    let pool = ResolutionPool::from_attributes([("year", Value::from(""))]);
    let descriptor =
        ParameterDescriptor::new("year", 0, DeclaredKind::Int).with_default(Value::Int(99));
    assert_eq!(resolve_one(descriptor, &pool, &container).unwrap(), Value::Int(0));
}

#[test]
fn untyped_and_object_kinds_are_never_coerced() {
    let pool = ResolutionPool::from_attributes([("id", Value::from("42"))]);
    let container = ServiceContainer::new();

    let untyped = ParameterDescriptor::new("id", 0, DeclaredKind::None);
    assert_eq!(resolve_one(untyped, &pool, &container).unwrap(), Value::from("42"));

    let object = ParameterDescriptor::new("id", 0, DeclaredKind::Object(TypeKey::of::<Clock>()));
    assert_eq!(resolve_one(object, &pool, &container).unwrap(), Value::from("42"));
}

#[test]
fn nullable_without_source_is_null() {
    let descriptor = ParameterDescriptor::new("title", 0, DeclaredKind::String).nullable(true);
    assert_eq!(
        resolve_one(descriptor, &ResolutionPool::new(), &ServiceContainer::new()).unwrap(),
        Value::Null
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Whole entrypoints
// ─────────────────────────────────────────────────────────────────────────────

struct Report;

#[entrypoint]
impl Report {
    #[invoke]
    fn render(&self, clock: Arc<Clock>, year: i64, #[default(None)] title: Option<String>) -> String {
        format!("{} {} {}", clock.label, year, title.unwrap_or_default())
    }
}

#[test]
fn full_chain_through_an_entrypoint() {
    let container = ServiceContainer::new()
        .with(Clock { label: "utc" })
        .with_named("year", 1492);
    let resolver = ParamsResolver::new(Arc::new(container));

    let args = resolver
        .resolve_entrypoint(&Report, &ResolutionPool::new())
        .unwrap();
    assert_eq!(args.len(), 3);
    assert_eq!(Report.invoke(args).unwrap(), Value::from("utc 1492 "));

    let pool = ResolutionPool::builder()
        .with_object(Arc::new(Clock { label: "local" }))
        .with_named("title", 7)
        .build();
    let args = resolver.resolve_entrypoint(&Report, &pool).unwrap();
    assert_eq!(Report.invoke(args).unwrap(), Value::from("local 1492 7"));
}

struct Detached;

impl Invokable for Detached {
    fn signature(&self) -> Option<Signature> {
        None
    }

    fn invoke(&self, _args: ResolvedArguments) -> Result<Value, InvokeError> {
        Ok(Value::Null)
    }
}

#[test]
fn missing_entrypoint_is_an_introspection_error() {
    let resolver = ParamsResolver::new(Arc::new(ServiceContainer::new()));
    let err = resolver
        .resolve_entrypoint(&Detached, &ResolutionPool::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Introspection(IntrospectionError::MissingEntrypoint { .. })
    ));
}
