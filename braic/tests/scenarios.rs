//! Whole-program scenarios driven through the interpreter end to end,
//! asserting on captured output and error text.

use std::io;

use braic_diagnostic::{Diagnostic, ErrorKind};
use braic_ffi::FfiHost;
use braic_ir::{FfiParam, Program, TypeTag};
use braic_sink::IoSink;
use braic_value::Value;

#[derive(Default)]
struct CapturingSink {
    lines: Vec<String>,
}

impl IoSink for CapturingSink {
    fn print(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
    fn println(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
    fn newline(&mut self) {
        self.lines.push(String::new());
    }
    fn input(&mut self) -> io::Result<String> {
        Ok(String::new())
    }
    fn input_with_prompt(&mut self, _prompt: &str) -> io::Result<String> {
        Ok(String::new())
    }
    fn graphics_mode(&mut self, _width: u32, _height: u32) {}
    fn text_mode(&mut self) {}
    fn clear_screen(&mut self) {}
    fn set_colour(&mut self, _r: u8, _g: u8, _b: u8) {}
    fn draw_pixel(&mut self, _x: i32, _y: i32) {}
    fn draw_line(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32) {}
    fn draw_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _filled: bool) {}
    fn draw_circle(&mut self, _x: i32, _y: i32, _r: i32, _filled: bool) {}
    fn draw_text(&mut self, _x: i32, _y: i32, _text: &str) {}
    fn refresh_screen(&mut self) {}
    fn key_pressed(&mut self, _name: &str) -> bool {
        false
    }
    fn mouse_clicked(&mut self) -> bool {
        false
    }
    fn get_mouse_pos(&mut self) -> (f64, f64) {
        (0.0, 0.0)
    }
    fn quit_requested(&mut self) -> bool {
        false
    }
    fn sleep_ms(&mut self, _n: u64) {}
    fn get_ticks(&mut self) -> i64 {
        0
    }
}

struct NoFfiHost;

impl FfiHost for NoFfiHost {
    fn call(
        &mut self,
        _library: &str,
        _function: &str,
        _params: &[FfiParam],
        _return_type: &TypeTag,
        _args: &[Value],
    ) -> Result<Value, Diagnostic> {
        panic!("no FFI calls expected in these scenarios")
    }
}

fn parse(source: &str) -> Program {
    let tokens = braic_lexer::tokenize(source).expect("lex");
    braic_parse::parse(tokens).expect("parse")
}

fn run(source: &str) -> (Result<(), Diagnostic>, String) {
    let program = parse(source);
    let mut sink = CapturingSink::default();
    let mut ffi = NoFfiHost;
    let mut interp =
        braic_eval::Interpreter::new(&mut sink, &mut ffi, Some("scenario.bs".to_string()));
    let result = interp.run(&program);
    (result, sink.lines.concat())
}

#[test]
fn integer_arithmetic_follows_operator_precedence() {
    let (result, output) = run("var x = 2 + 3 * 4; print x;");
    assert!(result.is_ok());
    assert_eq!(output, "14\n");
}

#[test]
fn string_concatenation_joins_in_order() {
    let (result, output) = run(r#"var n = "World"; print "Hello, " + n + "!";"#);
    assert!(result.is_ok());
    assert_eq!(output, "Hello, World!\n");
}

#[test]
fn counted_loop_accumulates_the_triangular_number() {
    let (result, output) =
        run("var s = 0; for (var i = 1; i <= 10; i = i + 1) { s = s + i; } print s;");
    assert!(result.is_ok());
    assert_eq!(output, "55\n");
}

#[test]
fn recursive_function_with_early_return_computes_fibonacci() {
    let (result, output) = run(
        "function f(n) as integer { if (n <= 1) { return n; } return f(n-1) + f(n-2); } print f(10);",
    );
    assert!(result.is_ok());
    assert_eq!(output, "55\n");
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let (result, _) = run("var a = 1; var b = 0; print a / b;");
    let err = result.expect_err("division by zero must fail");
    assert!(matches!(err.kind, ErrorKind::Runtime(_)));
    assert!(err.to_string().contains("Division by zero"));
}

#[test]
fn circular_import_is_rejected_before_evaluation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a_path = dir.path().join("a.bs");
    let b_path = dir.path().join("b.bs");
    std::fs::write(&a_path, "import \"b.bs\";\nprint 1;\n").expect("write a");
    std::fs::write(&b_path, "import \"a.bs\";\nprint 2;\n").expect("write b");

    let source = std::fs::read_to_string(&a_path).expect("read a");
    let err = braic_import::resolve(&source, &a_path).expect_err("cycle must be rejected");
    assert!(err.to_string().contains("Circular import detected"));
}
