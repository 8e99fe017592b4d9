use std::fmt;

use crate::value::Value;

/// Failure modes of the total arithmetic/comparison functions below. Carries
/// no source position — that belongs to the interpreter, which knows the
/// current statement and wraps these into a `braic_diagnostic::Diagnostic`.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueError {
    DivisionByZero,
    ModuloByZero,
    Domain { message: String },
    TypeMismatch { message: String },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::DivisionByZero => write!(f, "Division by zero"),
            ValueError::ModuloByZero => write!(f, "Division by zero"),
            ValueError::Domain { message } => write!(f, "{message}"),
            ValueError::TypeMismatch { message } => write!(f, "{message}"),
        }
    }
}

type VResult = Result<Value, ValueError>;

fn vec2_of(v: &Value) -> Option<crate::glm::Vec2> {
    match v {
        Value::Vec2(x) => Some(*x),
        _ => None,
    }
}
fn vec3_of(v: &Value) -> Option<crate::glm::Vec3> {
    match v {
        Value::Vec3(x) => Some(*x),
        _ => None,
    }
}
fn vec4_of(v: &Value) -> Option<crate::glm::Vec4> {
    match v {
        Value::Vec4(x) => Some(*x),
        _ => None,
    }
}

/// `left + right` per spec §4.4: string concatenation wins if either side
/// is a string, then matching-vector componentwise add, else numeric
/// promotion (double if either side is double, else integer).
pub fn add(left: &Value, right: &Value) -> VResult {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        return Ok(Value::String(format!("{}{}", left.string_form(), right.string_form())));
    }
    if let (Some(a), Some(b)) = (vec2_of(left), vec2_of(right)) {
        return Ok(Value::Vec2(a.add(b)));
    }
    if let (Some(a), Some(b)) = (vec3_of(left), vec3_of(right)) {
        return Ok(Value::Vec3(a.add(b)));
    }
    if let (Some(a), Some(b)) = (vec4_of(left), vec4_of(right)) {
        return Ok(Value::Vec4(a.add(b)));
    }
    numeric_binary(left, right, |a, b| a + b, |a, b| a.wrapping_add(b))
}

pub fn sub(left: &Value, right: &Value) -> VResult {
    if let (Some(a), Some(b)) = (vec2_of(left), vec2_of(right)) {
        return Ok(Value::Vec2(a.sub(b)));
    }
    if let (Some(a), Some(b)) = (vec3_of(left), vec3_of(right)) {
        return Ok(Value::Vec3(a.sub(b)));
    }
    if let (Some(a), Some(b)) = (vec4_of(left), vec4_of(right)) {
        return Ok(Value::Vec4(a.sub(b)));
    }
    numeric_binary(left, right, |a, b| a - b, |a, b| a.wrapping_sub(b))
}

pub fn mul(left: &Value, right: &Value) -> VResult {
    if let Some(v) = vec2_of(left) {
        if right.is_numeric() {
            return Ok(Value::Vec2(v.scale(right.to_f64() as f32)));
        }
    }
    if let Some(v) = vec2_of(right) {
        if left.is_numeric() {
            return Ok(Value::Vec2(v.scale(left.to_f64() as f32)));
        }
    }
    if let Some(v) = vec3_of(left) {
        if right.is_numeric() {
            return Ok(Value::Vec3(v.scale(right.to_f64() as f32)));
        }
    }
    if let Some(v) = vec3_of(right) {
        if left.is_numeric() {
            return Ok(Value::Vec3(v.scale(left.to_f64() as f32)));
        }
    }
    if let Some(v) = vec4_of(left) {
        if right.is_numeric() {
            return Ok(Value::Vec4(v.scale(right.to_f64() as f32)));
        }
    }
    if let Some(v) = vec4_of(right) {
        if left.is_numeric() {
            return Ok(Value::Vec4(v.scale(left.to_f64() as f32)));
        }
    }
    numeric_binary(left, right, |a, b| a * b, |a, b| a.wrapping_mul(b))
}

/// `/` always promotes to double and fails on a right operand that coerces
/// to zero.
pub fn div(left: &Value, right: &Value) -> VResult {
    let r = right.to_f64();
    if r == 0.0 {
        return Err(ValueError::DivisionByZero);
    }
    Ok(Value::Double(left.to_f64() / r))
}

/// `mod`/`%`: both operands coerce to integer.
pub fn modulo(left: &Value, right: &Value) -> VResult {
    let r = right.to_i64();
    if r == 0 {
        return Err(ValueError::ModuloByZero);
    }
    Ok(Value::Integer(left.to_i64().wrapping_rem(r)))
}

/// `^` / `pow(a, b)`: both coerce to double.
pub fn pow(left: &Value, right: &Value) -> VResult {
    Ok(Value::Double(left.to_f64().powf(right.to_f64())))
}

pub fn neg(value: &Value) -> VResult {
    match value.coerce_numeric() {
        Value::Integer(i) => Ok(Value::Integer(-i)),
        Value::Double(d) => Ok(Value::Double(-d)),
        _ => unreachable!("coerce_numeric always returns Integer or Double"),
    }
}

pub fn not(value: &Value) -> Value {
    Value::Boolean(!value.is_truthy())
}

pub fn logical_and(left: &Value, right: &Value) -> Value {
    Value::Boolean(left.is_truthy() && right.is_truthy())
}

pub fn logical_or(left: &Value, right: &Value) -> Value {
    Value::Boolean(left.is_truthy() || right.is_truthy())
}

fn numeric_binary(
    left: &Value,
    right: &Value,
    on_double: impl Fn(f64, f64) -> f64,
    on_int: impl Fn(i64, i64) -> i64,
) -> VResult {
    let l = left.coerce_numeric();
    let r = right.coerce_numeric();
    if l.is_double() || r.is_double() {
        Ok(Value::Double(on_double(l.to_f64(), r.to_f64())))
    } else {
        Ok(Value::Integer(on_int(l.to_i64(), r.to_i64())))
    }
}

/// Ordering comparisons (`<`, `<=`, `>`, `>=`): numeric if both sides are
/// numeric (after coercion), otherwise compare stringified forms.
pub fn compare_ordering(left: &Value, right: &Value) -> std::cmp::Ordering {
    if left.is_numeric() && right.is_numeric() {
        left.to_f64().partial_cmp(&right.to_f64()).unwrap_or(std::cmp::Ordering::Equal)
    } else {
        left.string_form().cmp(&right.string_form())
    }
}

/// Structural equality for same-variant values, falling back to the
/// ordering rule's comparison for cross-variant equality (spec §4.4).
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Double(a), Value::Double(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::NullPointer, Value::NullPointer) => true,
        _ if left.is_numeric() && right.is_numeric() => left.to_f64() == right.to_f64(),
        _ => left.string_form() == right.string_form(),
    }
}
