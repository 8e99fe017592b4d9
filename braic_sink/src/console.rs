use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::IoSink;

/// The default sink: plain stdout/stdin, no real graphics backend. Graphics
/// calls are accepted (so a program that calls them doesn't crash the
/// interpreter) but render nothing, matching spec §1's scoping of the
/// graphics sink's internals out of this core.
pub struct ConsoleSink {
    started_at: Instant,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self { started_at: Instant::now() }
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IoSink for ConsoleSink {
    fn print(&mut self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn println(&mut self, text: &str) {
        println!("{text}");
    }

    fn newline(&mut self) {
        println!();
    }

    fn input(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn input_with_prompt(&mut self, prompt: &str) -> io::Result<String> {
        self.print(prompt);
        self.input()
    }

    fn graphics_mode(&mut self, _width: u32, _height: u32) {
        tracing::debug!("graphics-mode requested but no graphics sink is wired in");
    }

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

    fn sleep_ms(&mut self, n: u64) {
        std::thread::sleep(Duration::from_millis(n));
    }

    fn get_ticks(&mut self) -> i64 {
        self.started_at.elapsed().as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_ticks_is_monotonic() {
        let mut sink = ConsoleSink::new();
        let a = sink.get_ticks();
        let b = sink.get_ticks();
        assert!(b >= a);
    }

    #[test]
    fn graphics_calls_are_accepted_as_no_ops() {
        let mut sink = ConsoleSink::new();
        sink.graphics_mode(640, 480);
        sink.draw_pixel(1, 1);
        sink.refresh_screen();
        assert!(!sink.quit_requested());
    }
}
