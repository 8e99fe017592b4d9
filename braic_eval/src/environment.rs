use rustc_hash::FxHashMap;

use braic_value::Value;

/// Variable storage per spec §4.5: "a stack of lexical frames plus one
/// global frame". Frames are pushed/popped exactly on user-function call,
/// never on `if`/`for`/`while` bodies, so there is never more than one
/// frame visible to a read or write besides the global frame — unlike a
/// closure-capturing environment, there is no parent chain to walk.
#[derive(Default)]
pub struct Environment {
    frames: Vec<FxHashMap<String, Value>>,
    globals: FxHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Innermost frame wins; else global.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(v) = frame.get(name) {
                return Some(v.clone());
            }
        }
        self.globals.get(name).cloned()
    }

    /// Innermost frame wins if it already declares `name`; else global if
    /// declared there; else declare in whichever frame is currently
    /// innermost (the current frame, or globals if no frame is open).
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.contains_key(name) {
                frame.insert(name.to_string(), value);
                return;
            }
        }
        if self.globals.contains_key(name) {
            self.globals.insert(name.to_string(), value);
            return;
        }
        match self.frames.last_mut() {
            Some(frame) => {
                frame.insert(name.to_string(), value);
            }
            None => {
                self.globals.insert(name.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_write_before_any_frame_is_visible_after_frame_pop() {
        let mut env = Environment::new();
        env.set("x", Value::Integer(1));
        env.push_frame();
        assert_eq!(env.get("x").unwrap().to_i64(), 1);
        env.pop_frame();
        assert_eq!(env.get("x").unwrap().to_i64(), 1);
    }

    #[test]
    fn frame_local_write_does_not_leak_to_globals() {
        let mut env = Environment::new();
        env.push_frame();
        env.set("y", Value::Integer(2));
        env.pop_frame();
        assert!(env.get("y").is_none());
    }

    #[test]
    fn write_to_name_already_global_updates_global_even_inside_a_frame() {
        let mut env = Environment::new();
        env.set("x", Value::Integer(1));
        env.push_frame();
        env.set("x", Value::Integer(99));
        env.pop_frame();
        assert_eq!(env.get("x").unwrap().to_i64(), 99);
    }
}
