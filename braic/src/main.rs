//! The braic driver: source loading, interpretation, and C99 compilation.
//!
//! `braic <file.bs>` and `braic -i <file.bs>` interpret directly. `braic -c
//! <file.bs> [-o <output>]` transpiles to C99, invokes the system C compiler,
//! and leaves a native binary behind.

mod tracing_setup;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use braic_diagnostic::emitter::{emit_stderr, ColorMode};
use braic_diagnostic::Diagnostic;
use braic_ffi::NativeFfiHost;
use braic_sink::ConsoleSink;

fn main() -> ExitCode {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    run(&args[1..])
}

fn run(args: &[String]) -> ExitCode {
    if args.is_empty() {
        print_usage();
        return ExitCode::FAILURE;
    }

    let mut mode = Mode::Interpret;
    let mut input_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-i" | "--interpret" => mode = Mode::Interpret,
            "-c" | "--compile" => mode = Mode::Compile,
            "-o" | "--output" => {
                i += 1;
                match args.get(i) {
                    Some(path) => output_path = Some(path.clone()),
                    None => {
                        eprintln!("error: -o/--output requires a path argument");
                        return ExitCode::FAILURE;
                    }
                }
            }
            "--log-level" => {
                i += 1;
                if let Some(level) = args.get(i) {
                    // honored only if BRAIC_LOG/RUST_LOG aren't already set; tracing_setup
                    // reads env vars at init() time, so set ours before any subscriber exists.
                    if std::env::var("BRAIC_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
                        std::env::set_var("BRAIC_LOG", level);
                    }
                } else {
                    eprintln!("error: --log-level requires a level argument");
                    return ExitCode::FAILURE;
                }
            }
            other => {
                if input_path.is_some() {
                    eprintln!("error: unexpected argument '{other}'");
                    return ExitCode::FAILURE;
                }
                input_path = Some(other.to_string());
            }
        }
        i += 1;
    }

    let Some(input_path) = input_path else {
        eprintln!("error: no input file given");
        print_usage();
        return ExitCode::FAILURE;
    };

    match mode {
        Mode::Interpret => interpret_file(&input_path),
        Mode::Compile => compile_file(&input_path, output_path.as_deref()),
    }
}

enum Mode {
    Interpret,
    Compile,
}

fn print_usage() {
    println!("braic — a toolchain for the brace-delimited BASIC dialect");
    println!();
    println!("Usage:");
    println!("  braic <file>                  interpret <file> (default)");
    println!("  braic -i|--interpret <file>    interpret <file>");
    println!("  braic -c|--compile <file>      transpile <file> to C99 and build a binary");
    println!("  braic -c <file> -o <output>    write the compiled binary to <output>");
    println!("  braic --help                   show this message");
    println!();
    println!("Logging is controlled by the BRAIC_LOG (or RUST_LOG) environment");
    println!("variable, or the --log-level flag; set BRAIC_LOG_TREE to enable");
    println!("hierarchical tree output.");
}

/// Reads the source file, resolves imports, lexes and parses it, patching
/// every diagnostic's `file` field with `path` (lexer/parser diagnostics are
/// constructed without knowledge of the originating file name).
fn load_and_parse(path: &str) -> Result<braic_ir::Program, ExitCode> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{path}': {e}");
            return Err(ExitCode::FAILURE);
        }
    };

    let resolved = braic_import::resolve(&source, Path::new(path)).map_err(|mut diag| {
        diag.file.get_or_insert_with(|| path.to_string());
        emit_stderr(&diag, ColorMode::Auto);
        ExitCode::FAILURE
    })?;

    for imported in &resolved.imported {
        tracing::debug!(path = %imported.display(), "resolved import");
    }

    let tokens = braic_lexer::tokenize(&resolved.source).map_err(|mut diag| {
        diag.file.get_or_insert_with(|| path.to_string());
        emit_stderr(&diag, ColorMode::Auto);
        ExitCode::FAILURE
    })?;

    let program = braic_parse::parse(tokens).map_err(|diags| {
        for mut diag in diags {
            diag.file.get_or_insert_with(|| path.to_string());
            emit_stderr(&diag, ColorMode::Auto);
        }
        ExitCode::FAILURE
    })?;

    Ok(program)
}

fn interpret_file(path: &str) -> ExitCode {
    let program = match load_and_parse(path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut sink = ConsoleSink::new();
    let mut ffi = NativeFfiHost::new();
    let mut interpreter =
        braic_eval::Interpreter::new(&mut sink, &mut ffi, Some(path.to_string()));

    match interpreter.run(&program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diag) => {
            report(diag, path);
            ExitCode::FAILURE
        }
    }
}

fn report(mut diag: Diagnostic, path: &str) {
    diag.file.get_or_insert_with(|| path.to_string());
    emit_stderr(&diag, ColorMode::Auto);
}

fn compile_file(path: &str, output: Option<&str>) -> ExitCode {
    let program = match load_and_parse(path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let c_source = match braic_transpile::generate(&program) {
        Ok(src) => src,
        Err(diag) => {
            report(diag, path);
            return ExitCode::FAILURE;
        }
    };

    let Ok(workdir) = tempfile::tempdir() else {
        eprintln!("error: could not create a temporary directory for compilation");
        return ExitCode::FAILURE;
    };

    let c_path = workdir.path().join("braic_out.c");
    if let Err(e) = std::fs::File::create(&c_path).and_then(|mut f| f.write_all(c_source.as_bytes()))
    {
        eprintln!("error: could not write generated C source: {e}");
        return ExitCode::FAILURE;
    }

    let output_path: PathBuf = match output {
        Some(o) => PathBuf::from(o),
        None => Path::new(path).with_extension(""),
    };

    tracing::debug!(c_path = %c_path.display(), output = %output_path.display(), "invoking system C compiler");

    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let status = std::process::Command::new(&cc)
        .arg("-std=c99")
        .arg("-O2")
        .arg(&c_path)
        .arg("-lm")
        .arg("-o")
        .arg(&output_path)
        .status();

    match status {
        Ok(status) if status.success() => {
            println!("wrote {}", output_path.display());
            ExitCode::SUCCESS
        }
        Ok(status) => {
            let code = status.code().unwrap_or(1);
            let diag = Diagnostic::compiler_invocation(code);
            emit_stderr(&diag, ColorMode::Auto);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: failed to invoke '{cc}': {e}");
            ExitCode::FAILURE
        }
    }
}
