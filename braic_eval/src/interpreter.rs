use rustc_hash::FxHashMap;

use braic_diagnostic::Diagnostic;
use braic_ffi::FfiHost;
use braic_ir::{BinaryOp, Component, ConstructorKind, Expr, FfiParam, Literal, Param, Position, Program, Stmt, TypeTag, UnaryOp};
use braic_sink::IoSink;
use braic_value::{self as value, glm, Shared, Value};

use crate::builtins;
use crate::environment::Environment;

/// A user function, registered into `Interpreter::functions` the moment its
/// `FunctionDecl` statement executes (spec §4.5: "Functions... occupy their
/// own process-global map populated by top-level declarations" — there is
/// no separate hoisting pass, matching `original_source`'s single top-to-
/// bottom walk where `visit(FunctionDecl)` is what populates the table).
struct FunctionDef {
    params: Vec<Param>,
    body: Vec<Stmt>,
}

struct StructDef {
    field_names: Vec<String>,
}

struct FfiDef {
    library: String,
    return_type: TypeTag,
    params: Vec<FfiParam>,
}

/// The explicit control-flow result of executing a statement or block,
/// replacing the original's `hasReturned` mutable flag (spec §9 redesign
/// flag): `Returning` threads the value back out to the nearest function
/// call frame instead of being polled after every statement.
enum Flow {
    Normal,
    Returning(Value),
}

pub struct Interpreter<'a> {
    env: Environment,
    functions: FxHashMap<String, FunctionDef>,
    structs: FxHashMap<String, StructDef>,
    ffi_decls: FxHashMap<String, FfiDef>,
    sink: &'a mut dyn IoSink,
    ffi_host: &'a mut dyn FfiHost,
    file: Option<String>,
}

impl<'a> Interpreter<'a> {
    pub fn new(sink: &'a mut dyn IoSink, ffi_host: &'a mut dyn FfiHost, file: Option<String>) -> Self {
        Self {
            env: Environment::new(),
            functions: FxHashMap::default(),
            structs: FxHashMap::default(),
            ffi_decls: FxHashMap::default(),
            sink,
            ffi_host,
            file,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), Diagnostic> {
        match self.exec_block(&program.statements)? {
            Flow::Normal | Flow::Returning(_) => Ok(()),
        }
    }

    fn err(&self, message: impl Into<String>, pos: Position) -> Diagnostic {
        Diagnostic::runtime(message, Some(pos), self.file.clone())
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, Diagnostic> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow @ Flow::Returning(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, Diagnostic> {
        crate::stack::ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> Result<Flow, Diagnostic> {
        match stmt {
            Stmt::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::VarAssign { name, indices, member, value, pos } => {
                let v = self.eval(value)?;
                self.store(name, indices, member.as_deref(), v, *pos)?;
                Ok(Flow::Normal)
            }
            Stmt::If { condition, then_block, else_block, .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec_block(then_block)
                } else {
                    self.exec_block(else_block)
                }
            }
            Stmt::CountedFor { name, init, condition, increment, body, .. } => {
                let start = self.eval(init)?;
                self.env.set(name, start);
                while self.eval(condition)?.is_truthy() {
                    match self.exec_block(body)? {
                        Flow::Normal => {}
                        flow @ Flow::Returning(_) => return Ok(flow),
                    }
                    self.eval(increment)?;
                }
                Ok(Flow::Normal)
            }
            Stmt::While { condition, body, .. } => {
                while self.eval(condition)?.is_truthy() {
                    match self.exec_block(body)? {
                        Flow::Normal => {}
                        flow @ Flow::Returning(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Return { value, .. } => {
                let v = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Integer(0),
                };
                Ok(Flow::Returning(v))
            }
            Stmt::FunctionDecl { name, params, body, .. } => {
                tracing::debug!(function = %name, "registering function declaration");
                self.functions.insert(name.clone(), FunctionDef { params: params.clone(), body: body.clone() });
                Ok(Flow::Normal)
            }
            Stmt::StructDecl { name, field_names, .. } => {
                tracing::debug!(struct_name = %name, "registering struct declaration");
                self.structs.insert(name.clone(), StructDef { field_names: field_names.clone() });
                Ok(Flow::Normal)
            }
            Stmt::Dim { name, type_tag, dimensions, pos } => {
                self.exec_dim(name, type_tag.as_ref(), dimensions, *pos)?;
                Ok(Flow::Normal)
            }
            Stmt::FfiFunctionDecl { name, library, return_type, params, .. } => {
                self.ffi_decls.insert(
                    name.clone(),
                    FfiDef { library: library.clone(), return_type: return_type.clone(), params: params.clone() },
                );
                Ok(Flow::Normal)
            }
            Stmt::Import { .. } => {
                // Imports are inlined by `braic_import` before lexing; by
                // the time the interpreter sees a `Stmt::Import` (only
                // possible if the import resolver somehow missed it),
                // there is nothing left to do.
                Ok(Flow::Normal)
            }
        }
    }

    /// `dim name(dims) as type;` — a typed default-initialised declaration,
    /// or an array allocation when dimensions are present.
    fn exec_dim(&mut self, name: &str, type_tag: Option<&TypeTag>, dimensions: &[Expr], pos: Position) -> Result<(), Diagnostic> {
        if dimensions.is_empty() {
            let tag_name = type_tag.map(ToString::to_string);
            let value = match tag_name.as_deref() {
                Some(tag) if self.structs.contains_key(tag) => self.default_record(tag),
                Some(tag) => Value::default_for_type(tag),
                None => Value::Integer(0),
            };
            self.env.set(name, value);
            return Ok(());
        }

        let mut shape = Vec::with_capacity(dimensions.len());
        for dim in dimensions {
            let n = self.eval(dim)?.to_i64();
            if n < 0 {
                return Err(self.err("array dimension must not be negative", pos));
            }
            shape.push(n as usize);
        }

        let array = match type_tag.map(ToString::to_string).as_deref() {
            Some("byte") => Value::new_byte_array(shape),
            Some("integer") => Value::new_int_array(shape),
            Some("double") => Value::new_double_array(shape),
            _ => Value::new_array(shape),
        };
        self.env.set(name, array);
        Ok(())
    }

    fn default_record(&self, type_name: &str) -> Value {
        let record = Value::new_record(type_name);
        if let (Value::Record(shared), Some(def)) = (&record, self.structs.get(type_name)) {
            let mut borrowed = shared.borrow_mut();
            for field in &def.field_names {
                borrowed.fields.insert(field.clone(), Value::Integer(0));
            }
        }
        record
    }

    /// Assignment to `name[indices].member` (array element, struct field,
    /// or plain variable — spec §9 open question (c): a struct member
    /// assignment through an array element is supported by resolving the
    /// base value first, then writing through its shared container).
    fn store(&mut self, name: &str, indices: &[Expr], member: Option<&str>, value: Value, pos: Position) -> Result<(), Diagnostic> {
        if indices.is_empty() && member.is_none() {
            self.env.set(name, value);
            return Ok(());
        }

        let base = self.env.get(name).ok_or_else(|| self.err(format!("undefined variable '{name}'"), pos))?;
        let idx = self.eval_indices(indices)?;

        match member {
            Some(field) => {
                let target = if idx.is_empty() { base } else { self.index_base(&base, &idx, pos)? };
                self.store_member(&target, field, value, pos)
            }
            None => self.store_index(&base, &idx, value, pos),
        }
    }

    fn eval_indices(&mut self, indices: &[Expr]) -> Result<Vec<i64>, Diagnostic> {
        indices.iter().map(|e| Ok(self.eval(e)?.to_i64())).collect()
    }

    fn store_member(&mut self, target: &Value, field: &str, value: Value, pos: Position) -> Result<(), Diagnostic> {
        match target {
            Value::Record(record) => {
                record.borrow_mut().fields.insert(field.to_string(), value);
                Ok(())
            }
            _ => Err(self.err(format!("cannot assign field '{field}' on a {}", target.type_tag_name()), pos)),
        }
    }

    fn store_index(&mut self, base: &Value, indices: &[i64], value: Value, pos: Position) -> Result<(), Diagnostic> {
        match base {
            Value::Array(arr) => {
                arr.borrow_mut().set(indices, value);
                Ok(())
            }
            Value::ByteArray(arr) => {
                let byte = value.to_i64().clamp(0, u8::MAX as i64) as u8;
                set_typed(arr, indices, byte, pos, self)
            }
            Value::IntArray(arr) => {
                let v = value.to_i64();
                set_typed(arr, indices, v, pos, self)
            }
            Value::DoubleArray(arr) => {
                let v = value.to_f64();
                set_typed(arr, indices, v, pos, self)
            }
            _ => Err(self.err(format!("cannot index a {}", base.type_tag_name()), pos)),
        }
    }

    /// Reads through zero or more array indices from a resolved base value.
    fn index_base(&self, base: &Value, indices: &[i64], pos: Position) -> Result<Value, Diagnostic> {
        match base {
            Value::Array(arr) => Ok(arr.borrow().get(indices)),
            Value::ByteArray(arr) => arr.borrow().get(indices).map(|b| Value::Integer(*b as i64)).ok_or_else(|| self.err("array index out of range", pos)),
            Value::IntArray(arr) => arr.borrow().get(indices).map(|i| Value::Integer(*i)).ok_or_else(|| self.err("array index out of range", pos)),
            Value::DoubleArray(arr) => arr.borrow().get(indices).map(|d| Value::Double(*d)).ok_or_else(|| self.err("array index out of range", pos)),
            _ => Err(self.err(format!("cannot index a {}", base.type_tag_name()), pos)),
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, Diagnostic> {
        crate::stack::ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Expr) -> Result<Value, Diagnostic> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Integer(i) => Value::Integer(*i),
                Literal::Double(d) => Value::Double(*d),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Null => Value::NullPointer,
            }),
            Expr::Variable { name, indices, member, pos } => self.eval_variable(name, indices, member.as_deref(), *pos),
            Expr::Binary { left, op, right, pos } => self.eval_binary(left, *op, right, *pos),
            Expr::Unary { op, operand, pos } => {
                let v = self.eval(operand)?;
                match op {
                    UnaryOp::Neg => value::neg(&v).map_err(|e| self.err(e.to_string(), *pos)),
                    UnaryOp::Not => Ok(value::not(&v)),
                }
            }
            Expr::Assign { name, indices, member, value: rhs, pos } => {
                let v = self.eval(rhs)?;
                self.store(name, indices, member.as_deref(), v.clone(), *pos)?;
                Ok(v)
            }
            Expr::ComponentAssign { object, component, value: rhs, pos } => {
                let v = self.eval(rhs)?;
                self.assign_component(object, *component, v.clone(), *pos)?;
                Ok(v)
            }
            Expr::Call { name, arguments, pos } => self.eval_call(name, arguments, *pos),
            Expr::StructLiteral { type_name, values, pos } => self.eval_struct_literal(type_name, values, *pos),
            Expr::Constructor { kind, arguments, pos } => self.eval_constructor(*kind, arguments, *pos),
            Expr::ComponentAccess { object, component, pos } => {
                let v = self.eval(object)?;
                read_component(&v, *component).ok_or_else(|| self.err("component access requires a vector or quaternion", *pos))
            }
        }
    }

    fn eval_variable(&mut self, name: &str, indices: &[Expr], member: Option<&str>, pos: Position) -> Result<Value, Diagnostic> {
        let base = self.env.get(name).ok_or_else(|| self.err(format!("undefined variable '{name}'"), pos))?;
        let indexed = if indices.is_empty() {
            base
        } else {
            let idx = self.eval_indices(indices)?;
            self.index_base(&base, &idx, pos)?
        };
        match member {
            Some(field) => match &indexed {
                Value::Record(record) => record
                    .borrow()
                    .fields
                    .get(field)
                    .cloned()
                    .ok_or_else(|| self.err(format!("record has no field '{field}'"), pos)),
                _ => match Component::from_name(field).and_then(|c| read_component(&indexed, c)) {
                    Some(v) => Ok(v),
                    None => Err(self.err(format!("cannot access member '{field}' on a {}", indexed.type_tag_name()), pos)),
                },
            },
            None => Ok(indexed),
        }
    }

    fn assign_component(&mut self, object: &Expr, component: Component, value: Value, pos: Position) -> Result<(), Diagnostic> {
        let scalar = value.to_f64() as f32;
        match object {
            Expr::Variable { name, indices, member, .. } if member.is_none() => {
                let mut current = self.env.get(name).ok_or_else(|| self.err(format!("undefined variable '{name}'"), pos))?;
                if !indices.is_empty() {
                    return Err(self.err("component assignment through an array index is not supported", pos));
                }
                write_component(&mut current, component, scalar).ok_or_else(|| self.err("component assignment requires a vector or quaternion", pos))?;
                self.env.set(name, current);
                Ok(())
            }
            _ => Err(self.err("invalid component-assignment target", pos)),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr, pos: Position) -> Result<Value, Diagnostic> {
        // `and`/`or` short-circuit: the right side is only evaluated when it
        // can affect the result.
        if op == BinaryOp::And {
            let l = self.eval(left)?;
            if !l.is_truthy() {
                return Ok(Value::Boolean(false));
            }
            return Ok(value::logical_and(&l, &self.eval(right)?));
        }
        if op == BinaryOp::Or {
            let l = self.eval(left)?;
            if l.is_truthy() {
                return Ok(Value::Boolean(true));
            }
            return Ok(value::logical_or(&l, &self.eval(right)?));
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;
        let wrap = |e: value::ValueError| self.err(e.to_string(), pos);
        match op {
            BinaryOp::Add => value::add(&l, &r).map_err(wrap),
            BinaryOp::Sub => value::sub(&l, &r).map_err(wrap),
            BinaryOp::Mul => value::mul(&l, &r).map_err(wrap),
            BinaryOp::Div => value::div(&l, &r).map_err(wrap),
            BinaryOp::Mod => value::modulo(&l, &r).map_err(wrap),
            BinaryOp::Pow => value::pow(&l, &r).map_err(wrap),
            BinaryOp::Eq => Ok(Value::Boolean(value::values_equal(&l, &r))),
            BinaryOp::NotEq => Ok(Value::Boolean(!value::values_equal(&l, &r))),
            BinaryOp::Lt => Ok(Value::Boolean(value::compare_ordering(&l, &r).is_lt())),
            BinaryOp::LtEq => Ok(Value::Boolean(value::compare_ordering(&l, &r).is_le())),
            BinaryOp::Gt => Ok(Value::Boolean(value::compare_ordering(&l, &r).is_gt())),
            BinaryOp::GtEq => Ok(Value::Boolean(value::compare_ordering(&l, &r).is_ge())),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above with short-circuiting"),
        }
    }

    fn eval_struct_literal(&mut self, type_name: &str, values: &[Expr], pos: Position) -> Result<Value, Diagnostic> {
        let field_names = self
            .structs
            .get(type_name)
            .map(|def| def.field_names.clone())
            .ok_or_else(|| self.err(format!("undefined struct type '{type_name}'"), pos))?;
        if values.len() != field_names.len() {
            return Err(self.err(format!("struct '{type_name}' expects {} field values, got {}", field_names.len(), values.len()), pos));
        }
        let record = Value::new_record(type_name);
        if let Value::Record(shared) = &record {
            let mut borrowed = shared.borrow_mut();
            for (field, expr) in field_names.iter().zip(values) {
                let v = self.eval(expr)?;
                borrowed.fields.insert(field.clone(), v);
            }
        }
        Ok(record)
    }

    fn eval_constructor(&mut self, kind: ConstructorKind, arguments: &[Expr], pos: Position) -> Result<Value, Diagnostic> {
        let mut args = Vec::with_capacity(arguments.len());
        for a in arguments {
            args.push(self.eval(a)?);
        }
        let f = |v: &Value| v.to_f64() as f32;
        match (kind, args.as_slice()) {
            (ConstructorKind::Vec2, [x, y]) => Ok(Value::Vec2(glm::Vec2 { x: f(x), y: f(y) })),
            (ConstructorKind::Vec3, [x, y, z]) => Ok(Value::Vec3(glm::Vec3 { x: f(x), y: f(y), z: f(z) })),
            (ConstructorKind::Vec4, [x, y, z, w]) => Ok(Value::Vec4(glm::Vec4 { x: f(x), y: f(y), z: f(z), w: f(w) })),
            (ConstructorKind::Quat, [w, x, y, z]) => Ok(Value::Quat(glm::Quat { w: f(w), x: f(x), y: f(y), z: f(z) })),
            (ConstructorKind::Mat3, []) => Ok(Value::Mat3(glm::Mat3::default())),
            (ConstructorKind::Mat4, []) => Ok(Value::Mat4(glm::Mat4::default())),
            _ => Err(self.err(format!("wrong number of arguments for a {kind:?} constructor"), pos)),
        }
    }

    /// Call dispatch, spec §4.5's seven tiers (plus the supplemented string
    /// built-in tier 1b): single-arg math, string built-ins, two-arg math,
    /// zero-arg math, GLM helpers, declared FFI routines, user functions.
    fn eval_call(&mut self, name: &str, arguments: &[Expr], pos: Position) -> Result<Value, Diagnostic> {
        let mut args = Vec::with_capacity(arguments.len());
        for a in arguments {
            args.push(self.eval(a)?);
        }

        if let Some(r) = builtins::dispatch(name, &args, pos, self.file.as_deref()) {
            return r;
        }
        if name == "print" {
            return self.builtin_print(&args);
        }
        if name == "input" {
            return self.builtin_input(pos);
        }
        if let Some(def) = self.ffi_decls.get(name) {
            let library = def.library.clone();
            let return_type = def.return_type.clone();
            let params = def.params.clone();
            return self
                .ffi_host
                .call(&library, name, &params, &return_type, &args)
                .map_err(|e| self.err(e.to_string(), pos));
        }
        self.call_user_function(name, args, pos)
    }

    fn builtin_print(&mut self, args: &[Value]) -> Result<Value, Diagnostic> {
        let rendered: Vec<String> = args.iter().map(Value::string_form).collect();
        self.sink.println(&rendered.join(" "));
        Ok(Value::Integer(0))
    }

    fn builtin_input(&mut self, pos: Position) -> Result<Value, Diagnostic> {
        let line = self.sink.input().map_err(|e| self.err(format!("input failed: {e}"), pos))?;
        Ok(match line.trim() {
            s if s.parse::<i64>().is_ok() => Value::Integer(s.parse().unwrap_or(0)),
            s if s.parse::<f64>().is_ok() => Value::Double(s.parse().unwrap_or(0.0)),
            _ => Value::String(line),
        })
    }

    fn call_user_function(&mut self, name: &str, args: Vec<Value>, pos: Position) -> Result<Value, Diagnostic> {
        let def_params;
        let def_body;
        match self.functions.get(name) {
            Some(def) => {
                def_params = def.params.clone();
                def_body = def.body.clone();
            }
            None => return Err(self.err(format!("unknown function: {name}"), pos)),
        }
        if args.len() != def_params.len() {
            return Err(self.err(format!("function {name} expects {} arguments, got {}", def_params.len(), args.len()), pos));
        }

        tracing::trace!(function = %name, args = args.len(), "calling user function");
        self.env.push_frame();
        for (param, value) in def_params.iter().zip(args) {
            self.env.set(&param.name, value);
        }
        let result = self.exec_block(&def_body);
        self.env.pop_frame();

        match result? {
            Flow::Returning(v) => Ok(v),
            Flow::Normal => Ok(Value::Integer(0)),
        }
    }
}

fn read_component(value: &Value, component: Component) -> Option<Value> {
    let f = |x: f32| Value::Double(x as f64);
    match (value, component) {
        (Value::Vec2(v), Component::X) => Some(f(v.x)),
        (Value::Vec2(v), Component::Y) => Some(f(v.y)),
        (Value::Vec3(v), Component::X) => Some(f(v.x)),
        (Value::Vec3(v), Component::Y) => Some(f(v.y)),
        (Value::Vec3(v), Component::Z) => Some(f(v.z)),
        (Value::Vec4(v), Component::X) => Some(f(v.x)),
        (Value::Vec4(v), Component::Y) => Some(f(v.y)),
        (Value::Vec4(v), Component::Z) => Some(f(v.z)),
        (Value::Vec4(v), Component::W) => Some(f(v.w)),
        (Value::Quat(q), Component::X) => Some(f(q.x)),
        (Value::Quat(q), Component::Y) => Some(f(q.y)),
        (Value::Quat(q), Component::Z) => Some(f(q.z)),
        (Value::Quat(q), Component::W) => Some(f(q.w)),
        _ => None,
    }
}

fn write_component(value: &mut Value, component: Component, scalar: f32) -> Option<()> {
    match (value, component) {
        (Value::Vec2(v), Component::X) => v.x = scalar,
        (Value::Vec2(v), Component::Y) => v.y = scalar,
        (Value::Vec3(v), Component::X) => v.x = scalar,
        (Value::Vec3(v), Component::Y) => v.y = scalar,
        (Value::Vec3(v), Component::Z) => v.z = scalar,
        (Value::Vec4(v), Component::X) => v.x = scalar,
        (Value::Vec4(v), Component::Y) => v.y = scalar,
        (Value::Vec4(v), Component::Z) => v.z = scalar,
        (Value::Vec4(v), Component::W) => v.w = scalar,
        (Value::Quat(q), Component::X) => q.x = scalar,
        (Value::Quat(q), Component::Y) => q.y = scalar,
        (Value::Quat(q), Component::Z) => q.z = scalar,
        (Value::Quat(q), Component::W) => q.w = scalar,
        _ => return None,
    }
    Some(())
}

fn set_typed<T: Clone + Default>(
    arr: &Shared<value::TypedArray<T>>,
    indices: &[i64],
    v: T,
    pos: Position,
    interp: &Interpreter<'_>,
) -> Result<(), Diagnostic> {
    if arr.borrow_mut().set(indices, v) {
        Ok(())
    } else {
        Err(interp.err("array index out of range", pos))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use braic_ffi::FfiHost;
    use braic_sink::IoSink;

    use super::*;

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
            panic!("no FFI calls expected in this test")
        }
    }

    fn run_program(source: &str) -> (Result<(), Diagnostic>, Vec<String>) {
        let tokens = braic_lexer::tokenize(source).expect("lex");
        let program = braic_parse::parse(tokens).expect("parse");
        let mut sink = CapturingSink::default();
        let mut ffi = NoFfiHost;
        let mut interp = Interpreter::new(&mut sink, &mut ffi, Some("test.bs".to_string()));
        let result = interp.run(&program);
        (result, sink.lines)
    }

    #[test]
    fn prints_the_result_of_arithmetic() {
        let (result, lines) = run_program("print(2 + 3 * 4);");
        assert!(result.is_ok());
        assert_eq!(lines, vec!["14"]);
    }

    #[test]
    fn counted_for_loop_accumulates() {
        let (result, lines) = run_program(
            r#"
            var total = 0;
            for (i = 0; i < 5; i = i + 1) {
                total = total + i;
            }
            print(total);
            "#,
        );
        assert!(result.is_ok());
        assert_eq!(lines, vec!["10"]);
    }

    #[test]
    fn user_function_call_returns_a_value() {
        let (result, lines) = run_program(
            r#"
            function square(n) {
                return n * n;
            }
            print(square(7));
            "#,
        );
        assert!(result.is_ok());
        assert_eq!(lines, vec!["49"]);
    }

    #[test]
    fn recursive_function_computes_factorial() {
        let (result, lines) = run_program(
            r#"
            function fact(n) {
                if (n <= 1) {
                    return 1;
                }
                return n * fact(n - 1);
            }
            print(fact(6));
            "#,
        );
        assert!(result.is_ok());
        assert_eq!(lines, vec!["720"]);
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let (result, _) = run_program("print(1 / 0);");
        assert!(result.is_err());
    }

    #[test]
    fn struct_literal_and_field_read() {
        // Field names deliberately avoid x/y/z/w: those are reserved for
        // vector swizzle access in `postfix()`'s `.` handling, so a struct
        // field sharing one of those names is unreachable through `.name`.
        let (result, lines) = run_program(
            r#"
            struct Point { width, height };
            var p = Point { 3, 4 };
            print(p.width + p.height);
            "#,
        );
        assert!(result.is_ok());
        assert_eq!(lines, vec!["7"]);
    }

    #[test]
    fn global_assigned_before_a_function_call_is_visible_after_return() {
        let (result, lines) = run_program(
            r#"
            var counter = 0;
            function bump() {
                counter = counter + 1;
                return counter;
            }
            bump();
            bump();
            print(counter);
            "#,
        );
        assert!(result.is_ok());
        assert_eq!(lines, vec!["2"]);
    }
}
