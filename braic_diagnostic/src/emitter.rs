//! Terminal emission of diagnostics, grounded on the teacher's
//! `ori_diagnostic::emitter::terminal` module: raw ANSI codes, no external
//! color crate, auto/always/never mode resolved against TTY detection done
//! by the caller.

use std::io::{self, IsTerminal, Write};

use crate::Diagnostic;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Writes a diagnostic to `writer` in the exact format of spec §7, always
/// terminated with a newline, optionally colored.
pub fn emit<W: Write>(writer: &mut W, diagnostic: &Diagnostic, use_color: bool) -> io::Result<()> {
    if use_color {
        writeln!(writer, "{}{diagnostic}{}", colors::ERROR, colors::RESET)
    } else {
        writeln!(writer, "{diagnostic}")
    }
}

/// Convenience entry point for the driver: emit to stderr, colored only if
/// stderr is a TTY and `mode` allows it.
pub fn emit_stderr(diagnostic: &Diagnostic, mode: ColorMode) {
    let mut stderr = io::stderr();
    let use_color = mode.should_use_colors(stderr.is_terminal());
    // A failure to write the diagnostic itself has nowhere left to go.
    let _ = emit(&mut stderr, diagnostic, use_color);
}
