use std::ffi::{c_void, CString};

use rustc_hash::FxHashMap;

use braic_diagnostic::{Diagnostic, FfiError};
use braic_ir::{FfiParam, TypeTag};
use braic_value::Value;

use crate::FfiHost;

/// A native argument after marshalling. Pointers and integers share a
/// register class in the C ABI, so both collapse to `isize` for dispatch;
/// `f64` is kept distinct because it is passed in a separate register
/// class on every ABI this targets.
enum Arg {
    Int(isize),
    Double(f64),
}

/// Leaked for the duration of the call so the native side sees a valid
/// `char*`; strings are the only argument kind requiring an owned buffer.
fn to_arg(value: &Value, tag: &TypeTag, strings: &mut Vec<CString>) -> Result<Arg, Diagnostic> {
    match tag {
        TypeTag::Double => Ok(Arg::Double(value.to_f64())),
        TypeTag::String => {
            let text = value.string_form();
            let c_string = CString::new(text).map_err(|e| {
                Diagnostic::ffi(FfiError::ArgMarshal { message: format!("string argument contains a NUL byte: {e}") })
            })?;
            let ptr = c_string.as_ptr() as isize;
            strings.push(c_string);
            Ok(Arg::Int(ptr))
        }
        TypeTag::Pointer | TypeTag::Named { is_pointer: true, .. } => match value {
            Value::Pointer(p) => Ok(Arg::Int(p.address as isize)),
            Value::NullPointer => Ok(Arg::Int(0)),
            _ => Ok(Arg::Int(value.to_i64() as isize)),
        },
        _ => Ok(Arg::Int(value.to_i64() as isize)),
    }
}

fn int_args(args: &[Arg]) -> Option<Vec<isize>> {
    args.iter()
        .map(|a| match a {
            Arg::Int(i) => Some(*i),
            Arg::Double(_) => None,
        })
        .collect()
}

fn double_args(args: &[Arg]) -> Option<Vec<f64>> {
    args.iter()
        .map(|a| match a {
            Arg::Double(d) => Some(*d),
            Arg::Int(_) => None,
        })
        .collect()
}

/// A `libloading`-backed `FfiHost`. Supports the common C ABI shapes this
/// language's `declare`/`ffi` surface actually produces: up to four
/// arguments that are either all integer/pointer-class or all `double`, per
/// call. A signature mixing integer and double parameters in the same call
/// is rejected with an `ArgMarshal` error — dispatching arbitrary native
/// signatures needs a full `libffi`-style call interface, which is out of
/// scope for this core (spec §1: the FFI collaborator's internals are an
/// external concern).
#[derive(Default)]
pub struct NativeFfiHost {
    libraries: FxHashMap<String, libloading::Library>,
}

impl NativeFfiHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn library(&mut self, name: &str) -> Result<&libloading::Library, Diagnostic> {
        if !self.libraries.contains_key(name) {
            tracing::debug!(library = name, "loading native library");
            // SAFETY: loading an arbitrary shared library and running its
            // static initializers is inherently unsafe; this is the
            // documented FFI boundary (spec §9) where that risk is
            // accepted on the caller's behalf.
            #[allow(unsafe_code, reason = "libloading::Library::new must dlopen the requested shared object")]
            let lib = unsafe { libloading::Library::new(name) }
                .map_err(|e| Diagnostic::ffi(FfiError::LibraryLoad { library: name.to_string(), cause: e.to_string() }))?;
            self.libraries.insert(name.to_string(), lib);
        }
        Ok(&self.libraries[name])
    }
}

impl FfiHost for NativeFfiHost {
    fn call(
        &mut self,
        library: &str,
        function: &str,
        params: &[FfiParam],
        return_type: &TypeTag,
        args: &[Value],
    ) -> Result<Value, Diagnostic> {
        if params.len() != args.len() {
            return Err(Diagnostic::ffi(FfiError::ArgMarshal {
                message: format!("{function} expects {} arguments, got {}", params.len(), args.len()),
            }));
        }
        if params.len() > 4 {
            return Err(Diagnostic::ffi(FfiError::ArgMarshal {
                message: format!("{function}: more than 4 FFI arguments are not supported"),
            }));
        }

        let lib = self.library(library)?;
        let symbol_name = CString::new(function).map_err(|e| {
            Diagnostic::ffi(FfiError::ArgMarshal { message: format!("function name contains a NUL byte: {e}") })
        })?;

        // SAFETY: `symbol_name` names a function the declaration claims
        // exists in `library`; a missing symbol is reported as an FFI
        // error rather than left to dlsym's own failure mode.
        #[allow(unsafe_code, reason = "libloading::Library::get resolves the symbol via dlsym")]
        let raw_symbol = unsafe { lib.get::<*const c_void>(symbol_name.as_bytes_with_nul()) }
            .map_err(|_| Diagnostic::ffi(FfiError::SymbolNotFound { library: library.to_string(), symbol: function.to_string() }))?;
        let fn_ptr = *raw_symbol;
        if fn_ptr.is_null() {
            return Err(Diagnostic::ffi(FfiError::NullDeref { context: format!("{library}::{function}") }));
        }

        let mut strings = Vec::new();
        let marshalled: Vec<Arg> = params
            .iter()
            .zip(args)
            .map(|(p, a)| to_arg(a, &p.type_tag, &mut strings))
            .collect::<Result<_, _>>()?;

        call_dispatch(fn_ptr, &marshalled, return_type)
    }
}

/// Dispatches the marshalled call based on arity and whether every
/// argument is integer-class or every argument is `double`.
#[allow(unsafe_code, reason = "calling through a dynamically resolved function pointer is the FFI boundary itself")]
fn call_dispatch(fn_ptr: *const c_void, args: &[Arg], return_type: &TypeTag) -> Result<Value, Diagnostic> {
    let returns_double = matches!(return_type, TypeTag::Double);

    if let Some(ints) = int_args(args) {
        let raw = match ints.as_slice() {
            [] => unsafe { call_int_0(fn_ptr, returns_double) },
            [a] => unsafe { call_int_1(fn_ptr, returns_double, *a) },
            [a, b] => unsafe { call_int_2(fn_ptr, returns_double, *a, *b) },
            [a, b, c] => unsafe { call_int_3(fn_ptr, returns_double, *a, *b, *c) },
            [a, b, c, d] => unsafe { call_int_4(fn_ptr, returns_double, *a, *b, *c, *d) },
            _ => unreachable!("arity already bounded to 4"),
        };
        return Ok(lift_return(raw, return_type));
    }

    if let Some(doubles) = double_args(args) {
        let raw = match doubles.as_slice() {
            [] => unsafe { call_double_0(fn_ptr, returns_double) },
            [a] => unsafe { call_double_1(fn_ptr, returns_double, *a) },
            [a, b] => unsafe { call_double_2(fn_ptr, returns_double, *a, *b) },
            [a, b, c] => unsafe { call_double_3(fn_ptr, returns_double, *a, *b, *c) },
            [a, b, c, d] => unsafe { call_double_4(fn_ptr, returns_double, *a, *b, *c, *d) },
            _ => unreachable!("arity already bounded to 4"),
        };
        return Ok(lift_return(raw, return_type));
    }

    Err(Diagnostic::ffi(FfiError::ArgMarshal {
        message: "mixed integer/double FFI argument lists are not supported".to_string(),
    }))
}

/// The raw result of a dispatched call: whichever register class the
/// declared return type used.
enum RawReturn {
    Int(isize),
    Double(f64),
}

fn lift_return(raw: RawReturn, return_type: &TypeTag) -> Value {
    match (raw, return_type) {
        (RawReturn::Double(d), _) => Value::Double(d),
        (RawReturn::Int(0), TypeTag::Pointer) => Value::NullPointer,
        (RawReturn::Int(i), TypeTag::Pointer | TypeTag::Named { is_pointer: true, .. }) => {
            Value::Pointer(braic_value::Pointer { address: i as usize, type_name: None })
        }
        (RawReturn::Int(i), _) => Value::Integer(i as i64),
    }
}

macro_rules! int_call {
    ($name:ident ( $($p:ident: $pt:ty),* )) => {
        /// # Safety
        /// `fn_ptr` must point to a native function whose parameters and
        /// return type exactly match the instantiated signature.
        unsafe fn $name(fn_ptr: *const c_void, returns_double: bool, $($p: $pt),*) -> RawReturn {
            if returns_double {
                let f: extern "C" fn($($pt),*) -> f64 = std::mem::transmute(fn_ptr);
                RawReturn::Double(f($($p),*))
            } else {
                let f: extern "C" fn($($pt),*) -> isize = std::mem::transmute(fn_ptr);
                RawReturn::Int(f($($p),*))
            }
        }
    };
}

int_call!(call_int_0());
int_call!(call_int_1(a: isize));
int_call!(call_int_2(a: isize, b: isize));
int_call!(call_int_3(a: isize, b: isize, c: isize));
int_call!(call_int_4(a: isize, b: isize, c: isize, d: isize));

int_call!(call_double_0());
int_call!(call_double_1(a: f64));
int_call!(call_double_2(a: f64, b: f64));
int_call!(call_double_3(a: f64, b: f64, c: f64));
int_call!(call_double_4(a: f64, b: f64, c: f64, d: f64));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_more_than_four_arguments() {
        let mut host = NativeFfiHost::new();
        let params: Vec<FfiParam> =
            (0..5).map(|i| FfiParam { name: format!("p{i}"), type_tag: TypeTag::Integer }).collect();
        let args = vec![Value::Integer(0); 5];
        let err = host.call("libc.so.6", "anything", &params, &TypeTag::Integer, &args).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn rejects_arity_mismatch() {
        let mut host = NativeFfiHost::new();
        let params = vec![FfiParam { name: "x".to_string(), type_tag: TypeTag::Integer }];
        let err = host.call("libc.so.6", "abs", &params, &TypeTag::Integer, &[]).unwrap_err();
        assert!(err.to_string().contains("expects"));
    }
}
