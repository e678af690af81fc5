//! Scalar type coercion.
//!
//! One total function per [`ScalarKind`]. Each returns the coerced value, or
//! `None` when the input cannot be represented in the target kind. Coercion
//! never panics and never raises; the resolver decides what a failure means.
//!
//! | input            | string      | int       | float     | bool                         |
//! |------------------|-------------|-----------|-----------|------------------------------|
//! | `true` / `false` | `"1"`/`""`  | `1`/`0`   | `1.0`/`0.0` | itself                     |
//! | integer          | decimal     | itself    | widened   | `0`/`1` only                 |
//! | float            | shortest    | integral  | itself    | `0.0`/`1.0` only             |
//! | string           | itself      | `[+-]?\d+`, `""`→0 | decimal, `""`→0.0 | `1 true yes on` / `0 false no off ""` |
//! | aggregate/object | passthrough | failure   | failure   | failure                      |

use crate::descriptor::ScalarKind;
use crate::value::Value;

const TRUE_TOKENS: [&str; 4] = ["1", "true", "yes", "on"];
const FALSE_TOKENS: [&str; 5] = ["0", "false", "no", "off", ""];

/// Coerces `value` to `kind`.
#[must_use]
pub fn coerce(kind: ScalarKind, value: &Value) -> Option<Value> {
    match kind {
        ScalarKind::String => to_string(value),
        ScalarKind::Int => to_int(value),
        ScalarKind::Float => to_float(value),
        ScalarKind::Bool => to_bool(value),
    }
}

/// Converts a scalar to its canonical text. Non-scalars pass through.
#[must_use]
pub fn to_string(value: &Value) -> Option<Value> {
    let text = match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => float_to_string(*n),
        other => return Some(other.clone()),
    };
    Some(Value::String(text))
}

/// Converts to an integer.
#[must_use]
pub fn to_int(value: &Value) -> Option<Value> {
    match value {
        Value::Int(n) => Some(Value::Int(*n)),
        Value::Bool(b) => Some(Value::Int(i64::from(*b))),
        Value::Float(n) => float_to_int(*n).map(Value::Int),
        Value::String(s) => parse_int(s).map(Value::Int),
        _ => None,
    }
}

/// Converts to a float.
#[must_use]
pub fn to_float(value: &Value) -> Option<Value> {
    match value {
        Value::Float(n) => Some(Value::Float(*n)),
        Value::Int(n) => Some(Value::Float(*n as f64)),
        Value::Bool(b) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => parse_float(s).map(Value::Float),
        _ => None,
    }
}

/// Converts to a boolean.
#[must_use]
pub fn to_bool(value: &Value) -> Option<Value> {
    let b = match value {
        Value::Bool(b) => *b,
        Value::Int(0) => false,
        Value::Int(1) => true,
        Value::Float(n) if *n == 0.0 => false,
        Value::Float(n) if *n == 1.0 => true,
        Value::String(s) => {
            let token = s.trim_ascii().to_ascii_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                true
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                false
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(Value::Bool(b))
}

fn float_to_string(n: f64) -> String {
    if n.is_nan() {
        "NAN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        // Plain decimal notation, never exponent form; integral values drop
        // the trailing `.0`.
        n.to_string()
    }
}

fn float_to_int(n: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && n >= -UPPER && n < UPPER {
        Some(n as i64)
    } else {
        None
    }
}

fn parse_int(s: &str) -> Option<i64> {
    // Only the empty string maps to zero; blank text is not a number.
    if s.is_empty() {
        return Some(0);
    }
    let s = s.trim_ascii();
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }
    let s = s.trim_ascii();
    if !is_decimal(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal(s: &str) -> bool {
    fn digits(b: &[u8]) -> usize {
        b.iter().take_while(|c| c.is_ascii_digit()).count()
    }

    let b = s.as_bytes();
    let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));

    let int_len = digits(&b[i..]);
    i += int_len;
    let mut frac_len = 0;
    if b.get(i) == Some(&b'.') {
        i += 1;
        frac_len = digits(&b[i..]);
        i += frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return false;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_len = digits(&b[i..]);
        if exp_len == 0 {
            return false;
        }
        i += exp_len;
    }

    i == b.len()
}
