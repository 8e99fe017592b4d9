//! Error kinds and diagnostic formatting, grounded on the teacher's
//! `ori_diagnostic` crate but hand-rolled (no `thiserror`) since the teacher
//! itself hand-rolls its `Diagnostic`/`Severity` types rather than deriving
//! them.

mod error;
pub mod emitter;

pub use error::{Diagnostic, ErrorKind, FfiError, ImportError, RuntimeError, SyntaxError};

#[cfg(test)]
mod tests {
    use super::*;
    use braic_ir::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn syntax_error_format_with_file() {
        let d = Diagnostic::syntax("unexpected token", Position::new(3, 7), Some("main.br".into()));
        assert_eq!(d.to_string(), "Syntax error: unexpected token at main.br:3:7");
    }

    #[test]
    fn runtime_error_format_without_position() {
        let d = Diagnostic::runtime("division by zero", None, Some("main.br".into()));
        assert_eq!(d.to_string(), "Runtime error: division by zero");
    }

    #[test]
    fn runtime_error_format_with_position() {
        let d = Diagnostic::runtime("division by zero", Some(Position::new(5, 1)), Some("main.br".into()));
        assert_eq!(d.to_string(), "Runtime error: division by zero at main.br:5");
    }

    #[test]
    fn circular_import_format() {
        let d = Diagnostic::import(ImportError::Circular {
            path: "b.br".into(),
            file: "a.br".into(),
            at: Position::new(2, 1),
        });
        assert_eq!(d.to_string(), "Circular import detected: \"b.br\" at a.br:2:1");
    }
}
