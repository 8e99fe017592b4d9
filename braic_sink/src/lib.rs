//! The I/O sink abstraction the interpreter consumes (spec §6): console
//! text I/O plus the graphics/input surface a windowed sink would implement.
//! Graphics, database, and GPIO sinks are out of scope for this core (spec
//! §1) — their marker traits exist so the driver's wiring names a complete
//! set of collaborators, but only `ConsoleSink` has a body.

mod console;

use std::io;

/// The external I/O collaborator, per spec §6. The interpreter only ever
/// calls through this trait; it never touches a terminal, framebuffer, or
/// clock directly.
pub trait IoSink {
    fn print(&mut self, text: &str);
    fn println(&mut self, text: &str);
    fn newline(&mut self);
    fn input(&mut self) -> io::Result<String>;
    fn input_with_prompt(&mut self, prompt: &str) -> io::Result<String>;

    fn graphics_mode(&mut self, width: u32, height: u32);
    fn text_mode(&mut self);
    fn clear_screen(&mut self);
    fn set_colour(&mut self, r: u8, g: u8, b: u8);
    fn draw_pixel(&mut self, x: i32, y: i32);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, filled: bool);
    fn draw_circle(&mut self, x: i32, y: i32, r: i32, filled: bool);
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
    fn refresh_screen(&mut self);

    fn key_pressed(&mut self, name: &str) -> bool;
    fn mouse_clicked(&mut self) -> bool;
    fn get_mouse_pos(&mut self) -> (f64, f64);
    fn quit_requested(&mut self) -> bool;
    fn sleep_ms(&mut self, n: u64);
    fn get_ticks(&mut self) -> i64;
}

/// Marker for a sink that backs the graphics calls with a real window and
/// event loop. No implementation ships here (spec §1 non-goal); a real one
/// would additionally implement `IoSink` and this trait.
pub trait GraphicsSink: IoSink {}

/// Marker for a sink exposing SQL-style storage to the FFI surface. Out of
/// scope for this core; declared so the driver's collaborator wiring is
/// documented even without a body.
pub trait DatabaseSink {}

/// Marker for a sink exposing GPIO/I2C/SPI/PWM/serial pins. Out of scope for
/// this core; declared for the same reason as `DatabaseSink`.
pub trait GpioSink {}

pub use console::ConsoleSink;
