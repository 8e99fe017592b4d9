//! The FFI collaborator abstraction (spec §6, §9's "FFI boundary"): the
//! core never dereferences a raw pointer directly, and every value→native
//! argument conversion is total, failing with an FFI error on mismatch
//! rather than trapping.

mod native;

use braic_diagnostic::Diagnostic;
use braic_ir::FfiParam;
use braic_ir::TypeTag;
use braic_value::Value;

/// A call-by-signature dispatcher to a native shared library, per spec §6's
/// FFI declaration surface: `(library, return-type, (name, type) params)`
/// in, one coerced `Value` out.
pub trait FfiHost {
    fn call(
        &mut self,
        library: &str,
        function: &str,
        params: &[FfiParam],
        return_type: &TypeTag,
        args: &[Value],
    ) -> Result<Value, Diagnostic>;
}

pub use native::NativeFfiHost;
