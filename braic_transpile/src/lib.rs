//! AST to C99 source emission, plus the embedded runtime-support template
//! (spec §4.6). `generate` is the only entry point the driver needs: it
//! returns a single self-contained `.c` translation unit that an external
//! `cc` invocation can compile and link with no other inputs.

mod codegen;
mod runtime;

pub use codegen::generate;
