//! The runtime value model: a tagged sum used uniformly by the interpreter
//! and by the transpiled runtime's emitted lookups, per spec §3–§4.4.

mod arith;
mod container;
pub mod glm;
mod value;

pub use arith::{add, compare_ordering, div, logical_and, logical_or, modulo, mul, neg, not, pow, sub, values_equal, ValueError};
pub use container::{flat_index, shared, DynArray, Record, Shared, TypedArray};
pub use value::{Pointer, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_promotes_to_double_only_when_needed() {
        let v = add(&Value::Integer(2), &Value::Integer(3)).unwrap();
        assert!(matches!(v, Value::Integer(5)));

        let v = add(&Value::Integer(2), &Value::Double(3.5)).unwrap();
        match v {
            Value::Double(d) => assert_eq!(d, 5.5),
            other => panic!("expected double, got {other:?}"),
        }
    }

    #[test]
    fn add_concatenates_strings() {
        let v = add(&Value::String("Hello, ".into()), &Value::String("World!".into())).unwrap();
        assert_eq!(v.string_form(), "Hello, World!");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = div(&Value::Integer(1), &Value::Integer(0)).unwrap_err();
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn division_always_promotes_to_double() {
        let v = div(&Value::Integer(10), &Value::Integer(4)).unwrap();
        match v {
            Value::Double(d) => assert_eq!(d, 2.5),
            other => panic!("expected double, got {other:?}"),
        }
    }

    #[test]
    fn modulo_by_zero_is_an_error() {
        assert!(modulo(&Value::Integer(5), &Value::Integer(0)).is_err());
    }

    #[test]
    fn string_coercion_falls_back_to_zero_on_parse_failure() {
        let v = Value::String("not a number".into()).coerce_numeric();
        assert!(matches!(v, Value::Integer(0)));
    }

    #[test]
    fn truthiness_matches_spec() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(1).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
        assert!(!Value::NullPointer.is_truthy());
    }

    #[test]
    fn comparison_falls_back_to_stringified_form_across_variants() {
        let ord = compare_ordering(&Value::String("10".into()), &Value::String("9".into()));
        assert_eq!(ord, std::cmp::Ordering::Less); // lexical, "10" < "9"
    }

    #[test]
    fn dyn_array_missing_entries_default_to_zero() {
        let arr = DynArray::new(vec![4]);
        assert_eq!(arr.get(&[2]).to_i64(), 0);
    }

    #[test]
    fn typed_array_is_dense_and_zero_initialized() {
        let arr: TypedArray<i64> = TypedArray::new(vec![3]);
        assert_eq!(arr.elements, vec![0, 0, 0]);
    }
}
