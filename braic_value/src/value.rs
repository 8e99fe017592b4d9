use std::fmt;

use crate::container::{shared, DynArray, Record, Shared, TypedArray};
use crate::glm;

/// An opaque native pointer: an address the core never dereferences (the
/// FFI boundary in `braic_ffi` is the only place raw pointers are touched),
/// plus the optional declared type name used for `pointer*`-style tags.
#[derive(Clone, Debug, PartialEq)]
pub struct Pointer {
    pub address: usize,
    pub type_name: Option<String>,
}

/// The tagged value sum of spec §3.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
    NullPointer,
    Pointer(Pointer),
    Array(Shared<DynArray>),
    ByteArray(Shared<TypedArray<u8>>),
    IntArray(Shared<TypedArray<i64>>),
    DoubleArray(Shared<TypedArray<f64>>),
    Record(Shared<Record>),
    Vec2(glm::Vec2),
    Vec3(glm::Vec3),
    Vec4(glm::Vec4),
    Mat3(glm::Mat3),
    Mat4(glm::Mat4),
    Quat(glm::Quat),
}

impl Value {
    pub fn integer(v: i64) -> Self {
        Value::Integer(v)
    }

    pub fn new_array(shape: Vec<usize>) -> Self {
        Value::Array(shared(DynArray::new(shape)))
    }

    pub fn new_byte_array(shape: Vec<usize>) -> Self {
        Value::ByteArray(shared(TypedArray::new(shape)))
    }

    pub fn new_int_array(shape: Vec<usize>) -> Self {
        Value::IntArray(shared(TypedArray::new(shape)))
    }

    pub fn new_double_array(shape: Vec<usize>) -> Self {
        Value::DoubleArray(shared(TypedArray::new(shape)))
    }

    pub fn new_record(type_name: impl Into<String>) -> Self {
        Value::Record(shared(Record::new(type_name)))
    }

    /// Default-initialized value for a `dim`'d scalar of the given type tag
    /// name (`"integer"`, `"double"`, `"string"`, `"boolean"`), per spec
    /// §4.6 ("dim emits a typed default initialisation").
    pub fn default_for_type(tag_name: &str) -> Self {
        match tag_name {
            "double" => Value::Double(0.0),
            "string" => Value::String(String::new()),
            "boolean" => Value::Boolean(false),
            "pointer" => Value::NullPointer,
            "vec2" => Value::Vec2(glm::Vec2::default()),
            "vec3" => Value::Vec3(glm::Vec3::default()),
            "vec4" => Value::Vec4(glm::Vec4::default()),
            "mat3" => Value::Mat3(glm::Mat3::default()),
            "mat4" => Value::Mat4(glm::Mat4::default()),
            "quat" => Value::Quat(glm::Quat::default()),
            _ => Value::Integer(0),
        }
    }

    /// Truthiness per spec §4.4.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Double(d) => *d != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::NullPointer => false,
            Value::Array(a) => !a.borrow().is_empty(),
            Value::ByteArray(a) => !a.borrow().is_empty(),
            Value::IntArray(a) => !a.borrow().is_empty(),
            Value::DoubleArray(a) => !a.borrow().is_empty(),
            Value::Record(r) => !r.borrow().is_empty(),
            Value::Pointer(_) => true,
            Value::Vec2(_) | Value::Vec3(_) | Value::Vec4(_) | Value::Mat3(_) | Value::Mat4(_) | Value::Quat(_) => true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn type_tag_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::NullPointer | Value::Pointer(_) => "pointer",
            Value::Array(_) => "array",
            Value::ByteArray(_) => "byte[]",
            Value::IntArray(_) => "integer[]",
            Value::DoubleArray(_) => "double[]",
            Value::Record(_) => "record",
            Value::Vec2(_) => "vec2",
            Value::Vec3(_) => "vec3",
            Value::Vec4(_) => "vec4",
            Value::Mat3(_) => "mat3",
            Value::Mat4(_) => "mat4",
            Value::Quat(_) => "quat",
        }
    }

    /// `(a value's string form, per spec §4.4)`.
    pub fn string_form(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format_double(*d),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Value::NullPointer => String::new(),
            Value::Pointer(p) => match &p.type_name {
                Some(name) => format!("<pointer:{name}>"),
                None => "<pointer>".to_string(),
            },
            Value::Record(r) => format!("<{}>", r.borrow().type_name),
            Value::Array(_) | Value::ByteArray(_) | Value::IntArray(_) | Value::DoubleArray(_) => {
                format!("<array:{}>", self.type_tag_name())
            }
            Value::Vec2(v) => format!("({}, {})", v.x, v.y),
            Value::Vec3(v) => format!("({}, {}, {})", v.x, v.y, v.z),
            Value::Vec4(v) => format!("({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Mat3(_) => "<mat3>".to_string(),
            Value::Mat4(_) => "<mat4>".to_string(),
            Value::Quat(q) => format!("({}, {}, {}, {})", q.w, q.x, q.y, q.z),
        }
    }

    /// Coerce to a numeric `Value` (`Integer` or `Double`), per spec §4.4.
    pub fn coerce_numeric(&self) -> Value {
        match self {
            Value::Integer(_) | Value::Double(_) => self.clone(),
            Value::Boolean(b) => Value::Integer(i64::from(*b)),
            Value::NullPointer => Value::Integer(0),
            Value::String(s) => {
                if s.contains('.') {
                    Value::Double(s.parse::<f64>().unwrap_or(0.0))
                } else {
                    match s.parse::<i64>() {
                        Ok(n) => Value::Integer(n),
                        Err(_) => Value::Integer(0),
                    }
                }
            }
            _ => Value::Integer(0),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self.coerce_numeric() {
            Value::Integer(i) => i as f64,
            Value::Double(d) => d,
            _ => 0.0,
        }
    }

    pub fn to_i64(&self) -> i64 {
        match self.coerce_numeric() {
            Value::Integer(i) => i,
            Value::Double(d) => d as i64,
            _ => 0,
        }
    }
}

/// Natural base-10 rendering: integral doubles still print a trailing `.0`
/// point so `3.0` never collapses to the integer form `3`.
fn format_double(d: f64) -> String {
    if d.is_nan() {
        "nan".to_string()
    } else if d.is_infinite() {
        if d > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if d == d.trunc() && d.abs() < 1e15 {
        format!("{d:.1}")
    } else {
        format!("{d}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string_form())
    }
}
