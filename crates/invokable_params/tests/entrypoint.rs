//! Tests for the `#[entrypoint]` attribute macro.

use invokable_params::prelude::*;
use std::sync::Arc;

struct Mailer;

// ─────────────────────────────────────────────────────────────────────────────
// Signatures
// ─────────────────────────────────────────────────────────────────────────────

struct Checkout {
    currency: &'static str,
}

#[entrypoint]
impl Checkout {
    fn format(&self, amount: f64) -> String {
        format!("{amount:.2} {}", self.currency)
    }

    #[invoke]
    fn run(
        &self,
        mailer: Arc<Mailer>,
        amount: f64,
        #[default(1)] quantity: u32,
        #[default(None)] coupon: Option<String>,
        r#type: String,
        extra: Value,
    ) -> String {
        let _ = (mailer, coupon, extra);
        let kind = r#type;
        format!("{} x{quantity} {kind}", self.format(amount))
    }
}

#[test]
fn signature_follows_the_method() {
    let descriptors = introspect(&Checkout { currency: "EUR" }).unwrap();
    let names: Vec<_> = descriptors.iter().map(ParameterDescriptor::name).collect();
    assert_eq!(names, vec!["mailer", "amount", "quantity", "coupon", "type", "extra"]);

    assert_eq!(
        descriptors[0].declared_kind(),
        &DeclaredKind::Object(TypeKey::of::<Mailer>())
    );
    assert_eq!(descriptors[1].declared_kind(), &DeclaredKind::Float);
    assert!(!descriptors[1].has_default());

    assert_eq!(descriptors[2].declared_kind(), &DeclaredKind::Int);
    assert_eq!(descriptors[2].default_value(), Some(&Value::Int(1)));
    assert!(!descriptors[2].is_nullable());

    assert_eq!(descriptors[3].declared_kind(), &DeclaredKind::String);
    assert!(descriptors[3].is_nullable());
    assert_eq!(descriptors[3].default_value(), Some(&Value::Null));

    assert_eq!(descriptors[5].declared_kind(), &DeclaredKind::None);
}

#[test]
fn invoke_converts_arguments_in_order() {
    let checkout = Checkout { currency: "EUR" };
    let args = ResolvedArguments::new(vec![
        Value::object(Mailer),
        Value::Int(3),
        Value::Int(2),
        Value::Null,
        Value::from("gift"),
        Value::Null,
    ]);

    assert_eq!(checkout.invoke(args).unwrap(), Value::from("3.00 EUR x2 gift"));
}

#[test]
fn invoke_rejects_wrong_arity_and_shapes() {
    let checkout = Checkout { currency: "EUR" };

    let err = checkout
        .invoke(ResolvedArguments::new(vec![Value::Null]))
        .unwrap_err();
    assert_eq!(
        err,
        InvokeError::ArgumentCount {
            expected: 6,
            actual: 1
        }
    );

    let err = checkout
        .invoke(ResolvedArguments::new(vec![
            Value::object(Mailer),
            Value::from("three"),
            Value::Int(2),
            Value::Null,
            Value::from("gift"),
            Value::Null,
        ]))
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::InvalidArgument { ref name, actual: "string", .. } if name == "amount"
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Return values
// ─────────────────────────────────────────────────────────────────────────────

struct Fallible;

#[entrypoint]
impl Fallible {
    #[invoke]
    fn call(&self, fail: bool) -> Result<i64, String> {
        if fail { Err("boom".to_string()) } else { Ok(7) }
    }
}

#[test]
fn result_errors_become_execution_errors() {
    let ok = Fallible.invoke(ResolvedArguments::new(vec![Value::Bool(false)]));
    assert_eq!(ok, Ok(Value::Int(7)));

    let err = Fallible.invoke(ResolvedArguments::new(vec![Value::Bool(true)]));
    assert_eq!(err, Err(InvokeError::Execution("boom".into())));
}

struct Silent;

#[entrypoint]
impl Silent {
    #[invoke]
    fn call(&self) {}
}

#[test]
fn unit_returns_null() {
    assert!(Silent.signature().unwrap().is_empty());
    assert_eq!(Silent.invoke(ResolvedArguments::default()), Ok(Value::Null));
}

#[test]
fn entrypoint_name_is_the_type_name() {
    assert!(Silent.name().ends_with("Silent"));
}
