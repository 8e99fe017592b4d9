use std::fmt;

use braic_ir::Position;

/// The five error kinds of spec §7, each carrying the context it needs to
/// produce the user-visible format in its own `Display` impl.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    Syntax(SyntaxError),
    Runtime(RuntimeError),
    Import(ImportError),
    Ffi(FfiError),
    CompilerInvocation { exit_code: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    /// Absent only when a runtime error is raised before the interpreter
    /// has entered its first statement (should not happen in practice, but
    /// the format in §7 explicitly allows for it).
    pub pos: Option<Position>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportError {
    NotFound {
        path: String,
        file: String,
        at: Position,
    },
    ReadError {
        path: String,
        file: String,
        at: Position,
        cause: String,
    },
    MalformedDirective {
        file: String,
        at: Position,
        message: String,
    },
    Circular {
        path: String,
        file: String,
        at: Position,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FfiError {
    LibraryLoad { library: String, cause: String },
    SymbolNotFound { library: String, symbol: String },
    ArgMarshal { message: String },
    NullDeref { context: String },
}

/// A fully-formed diagnostic: an error kind plus the file it is attributed
/// to (the root source file, since the import resolver has already inlined
/// every transitively imported file into one logical buffer by the time the
/// lexer, parser, or interpreter run).
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub file: Option<String>,
}

impl Diagnostic {
    pub fn syntax(message: impl Into<String>, pos: Position, file: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Syntax(SyntaxError {
                message: message.into(),
                pos,
            }),
            file,
        }
    }

    pub fn runtime(message: impl Into<String>, pos: Option<Position>, file: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime(RuntimeError {
                message: message.into(),
                pos,
            }),
            file,
        }
    }

    pub fn import(kind: ImportError) -> Self {
        Self {
            kind: ErrorKind::Import(kind),
            file: None,
        }
    }

    pub fn ffi(kind: FfiError) -> Self {
        Self {
            kind: ErrorKind::Ffi(kind),
            file: None,
        }
    }

    pub fn compiler_invocation(exit_code: i32) -> Self {
        Self {
            kind: ErrorKind::CompilerInvocation { exit_code },
            file: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Syntax(e) => match &self.file {
                Some(file) => write!(f, "Syntax error: {} at {file}:{}", e.message, e.pos),
                None => write!(f, "Syntax error: {}", e.message),
            },
            ErrorKind::Runtime(e) => match (&self.file, e.pos) {
                (Some(file), Some(pos)) => {
                    write!(f, "Runtime error: {} at {file}:{}", e.message, pos.line)
                }
                (None, Some(pos)) => write!(f, "Runtime error: {} at {}", e.message, pos.line),
                (_, None) => write!(f, "Runtime error: {}", e.message),
            },
            ErrorKind::Import(e) => match e {
                ImportError::NotFound { path, file, at } => {
                    write!(f, "Import error: file not found: \"{path}\" at {file}:{at}")
                }
                ImportError::ReadError { path, file, at, cause } => {
                    write!(f, "Import error: failed to read \"{path}\" at {file}:{at}: {cause}")
                }
                ImportError::MalformedDirective { file, at, message } => {
                    write!(f, "Import error: {message} at {file}:{at}")
                }
                ImportError::Circular { path, file, at } => {
                    write!(f, "Circular import detected: \"{path}\" at {file}:{at}")
                }
            },
            ErrorKind::Ffi(e) => match e {
                FfiError::LibraryLoad { library, cause } => {
                    write!(f, "FFI error: failed to load library \"{library}\": {cause}")
                }
                FfiError::SymbolNotFound { library, symbol } => {
                    write!(f, "FFI error: symbol \"{symbol}\" not found in \"{library}\"")
                }
                FfiError::ArgMarshal { message } => write!(f, "FFI error: {message}"),
                FfiError::NullDeref { context } => {
                    write!(f, "FFI error: null pointer dereference in {context}")
                }
            },
            ErrorKind::CompilerInvocation { exit_code } => {
                write!(f, "Compiler invocation failed with exit code {exit_code}")
            }
        }
    }
}

impl std::error::Error for Diagnostic {}
