use braic_diagnostic::Diagnostic;
use braic_ir::{
    BinaryOp, Component, ConstructorKind, Expr, FfiParam, Literal, Param, Program, Stmt, Token,
    TokenKind, TypeTag, UnaryOp,
};

use crate::recovery::STATEMENT_START;

/// Recursive-descent parser over a finished token vector, per spec §4.3.
/// Holds no state beyond its cursor into `tokens`, so a fresh `Parser` is
/// built per call and never reused — mirrors the teacher's per-file parser
/// lifetime without its incremental-reparse bookkeeping, which braic has no
/// use for.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parses a full token stream into a program. Per spec §4.3, a reported
/// syntax error aborts only the statement in progress: the parser
/// resynchronizes and keeps parsing, so a single pass can surface more than
/// one error. Returns `Ok` only if every top-level statement parsed clean.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Vec<Diagnostic>> {
    let mut parser = Parser { tokens, pos: 0 };
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    while !parser.is_at_end() {
        match parser.statement() {
            Ok(stmt) => statements.push(stmt),
            Err(e) => {
                errors.push(e);
                parser.synchronize();
            }
        }
    }

    if errors.is_empty() {
        Ok(Program { statements })
    } else {
        Err(errors)
    }
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos - 1]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<String, Diagnostic> {
        Ok(self.expect(TokenKind::Identifier, message)?.lexeme)
    }

    fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::syntax(message.into(), self.peek().position(), None)
    }

    /// Advances past tokens until the next `;` (consumed) or the next token
    /// that can start a statement (left for the caller), per spec §4.3.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if STATEMENT_START.contains(self.peek_kind()) {
                return;
            }
            self.advance();
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        self.expect(TokenKind::LBrace, "expected '{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace, "expected '}'")?;
        Ok(statements)
    }

    fn type_tag(&mut self) -> Result<TypeTag, Diagnostic> {
        let name = self.expect_identifier("expected type name")?;
        Ok(TypeTag::from_ident(&name))
    }

    /// `ffiParam := IDENT "as" (typeTag | "pointer") "*"?`
    fn ffi_param(&mut self) -> Result<FfiParam, Diagnostic> {
        let name = self.expect_identifier("expected parameter name")?;
        self.expect(TokenKind::As, "expected 'as' after parameter name")?;
        let type_tag = self.ffi_type()?;
        Ok(FfiParam { name, type_tag })
    }

    fn ffi_type(&mut self) -> Result<TypeTag, Diagnostic> {
        if self.match_kind(TokenKind::Pointer) {
            return Ok(TypeTag::Pointer);
        }
        let name = self.expect_identifier("expected type name")?;
        if self.match_kind(TokenKind::Star) {
            Ok(TypeTag::Named { name, is_pointer: true })
        } else {
            Ok(TypeTag::from_ident(&name))
        }
    }

    // ---- statements ----

    fn statement(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek_kind() {
            TokenKind::Var => self.var_decl(),
            TokenKind::If => self.if_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::Function => self.function_decl(),
            TokenKind::Struct => self.struct_decl(),
            TokenKind::Dim => self.dim_stmt(),
            TokenKind::Declare => self.declare_stmt(),
            TokenKind::Ffi => self.ffi_stmt(),
            TokenKind::Import => self.import_stmt(),
            _ => self.expr_stmt(),
        }
    }

    /// `"var" IDENT ("[" expr ("," expr)* "]")? ("." IDENT)? "=" expression ";"`
    ///
    /// The grammar's two bracket clauses collapse to one index list here:
    /// `Stmt::VarAssign` has a single `indices: Vec<Expr>` field, and a
    /// single bracketed, comma-separated list covers both the scalar-index
    /// and multi-index cases.
    fn var_decl(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "var"
        let name = self.expect_identifier("expected variable name")?;

        let mut indices = Vec::new();
        if self.match_kind(TokenKind::LBracket) {
            indices.push(self.expression()?);
            while self.match_kind(TokenKind::Comma) {
                indices.push(self.expression()?);
            }
            self.expect(TokenKind::RBracket, "expected ']' after array indices")?;
        }

        let member = if self.match_kind(TokenKind::Dot) {
            Some(self.expect_identifier("expected member name after '.'")?)
        } else {
            None
        };

        self.expect(TokenKind::Assign, "expected '=' after variable name")?;
        let value = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;

        Ok(Stmt::VarAssign { name, indices, member, value, pos })
    }

    fn if_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "if"
        self.expect(TokenKind::LParen, "expected '(' after 'if'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after if condition")?;
        let then_block = self.block()?;

        let else_block = if self.match_kind(TokenKind::Else) {
            if self.check(TokenKind::If) {
                vec![self.if_stmt()?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };

        Ok(Stmt::If { condition, then_block, else_block, pos })
    }

    /// `"for" "(" ("var"? IDENT "=" expr) ";" expr ";" expr ")" block`
    fn for_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "for"
        self.expect(TokenKind::LParen, "expected '(' after 'for'")?;
        self.match_kind(TokenKind::Var);
        let name = self.expect_identifier("expected loop variable name")?;
        self.expect(TokenKind::Assign, "expected '=' after loop variable")?;
        let init = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after for initializer")?;
        let condition = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after for condition")?;
        let increment = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after for increment")?;
        let body = self.block()?;

        Ok(Stmt::CountedFor { name, init, condition, increment, body, pos })
    }

    fn while_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "while"
        self.expect(TokenKind::LParen, "expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "expected ')' after while condition")?;
        let body = self.block()?;
        Ok(Stmt::While { condition, body, pos })
    }

    fn return_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "return"
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "expected ';' after return statement")?;
        Ok(Stmt::Return { value, pos })
    }

    fn function_decl(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "function"
        let name = self.expect_identifier("expected function name")?;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let pname = self.expect_identifier("expected parameter name")?;
                let type_tag = if self.match_kind(TokenKind::As) {
                    Some(self.type_tag()?)
                } else {
                    None
                };
                params.push(Param { name: pname, type_tag });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;

        let return_type = if self.match_kind(TokenKind::As) {
            Some(self.type_tag()?)
        } else {
            None
        };

        let body = self.block()?;
        Ok(Stmt::FunctionDecl { name, params, return_type, body, pos })
    }

    /// `"struct" IDENT "{" IDENT ("," IDENT)* "}" ";"`
    ///
    /// Fields carry no declared type in this grammar; each gets the
    /// catch-all `variant` type tag, matching the original implementation's
    /// default for the same syntax.
    fn struct_decl(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "struct"
        let name = self.expect_identifier("expected struct name")?;
        self.expect(TokenKind::LBrace, "expected '{' after struct name")?;

        let mut field_names = Vec::new();
        let mut field_types = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                field_names.push(self.expect_identifier("expected field name")?);
                field_types.push(TypeTag::from_ident("variant"));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "expected '}' after struct body")?;
        self.expect(TokenKind::Semicolon, "expected ';' after struct declaration")?;

        Ok(Stmt::StructDecl { name, field_names, field_types, pos })
    }

    fn dim_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "dim"
        let name = self.expect_identifier("expected variable name")?;

        let mut dimensions = Vec::new();
        if self.match_kind(TokenKind::LParen) {
            loop {
                dimensions.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "expected ')' after array dimensions")?;
        }

        let type_tag = if self.match_kind(TokenKind::As) {
            Some(self.type_tag()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expected ';' after dim statement")?;
        Ok(Stmt::Dim { name, type_tag, dimensions, pos })
    }

    /// `"declare" "ffi"? "function" IDENT ("from"|"lib") STRING
    ///   ("(" ffiParam ("," ffiParam)* ")")? "as" typeTag ";"`
    fn declare_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "declare"
        self.match_kind(TokenKind::Ffi);
        self.expect(TokenKind::Function, "expected 'function' after 'declare'")?;
        let name = self.expect_identifier("expected function name")?;

        if !self.match_kind(TokenKind::From) {
            self.expect(TokenKind::Lib, "expected 'from' or 'lib' after function name")?;
        }
        let library = self.expect(TokenKind::String, "expected library name string")?.lexeme;

        let mut params = Vec::new();
        if self.match_kind(TokenKind::LParen) {
            if !self.check(TokenKind::RParen) {
                loop {
                    params.push(self.ffi_param()?);
                    if !self.match_kind(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "expected ')' after parameters")?;
        }

        self.expect(TokenKind::As, "expected 'as' for return type")?;
        let return_type = self.ffi_type()?;
        self.expect(TokenKind::Semicolon, "expected ';' after declare statement")?;

        Ok(Stmt::FfiFunctionDecl { name, library, return_type, params, pos })
    }

    /// `"ffi" typeTag IDENT "(" ffiParam ("," ffiParam)* ")" "from" STRING ";"`
    fn ffi_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "ffi"
        let return_type = self.ffi_type()?;
        let name = self.expect_identifier("expected function name")?;

        self.expect(TokenKind::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.ffi_param()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;

        self.expect(TokenKind::From, "expected 'from' after parameters")?;
        let library = self.expect(TokenKind::String, "expected library name string")?.lexeme;
        self.expect(TokenKind::Semicolon, "expected ';' after FFI declaration")?;

        Ok(Stmt::FfiFunctionDecl { name, library, return_type, params, pos })
    }

    fn import_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        self.advance(); // "import"
        let path = self.expect(TokenKind::String, "expected filename string after 'import'")?.lexeme;
        self.expect(TokenKind::Semicolon, "expected ';' after import statement")?;
        Ok(Stmt::Import { path, pos })
    }

    fn expr_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let pos = self.peek().position();
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after expression")?;
        Ok(Stmt::Expression { expr, pos })
    }

    // ---- expressions, precedence low to high ----

    fn expression(&mut self) -> Result<Expr, Diagnostic> {
        self.assignment()
    }

    /// Parses the lowest-precedence `or` level, then rewrites a trailing
    /// `=` into the appropriate assign node per spec §4.3: a left-hand
    /// `variable`/`index`/`component-access` is valid; anything else is a
    /// syntax error.
    fn assignment(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.or_expr()?;

        if self.match_kind(TokenKind::Assign) {
            let pos = self.previous().position();
            let value = Box::new(self.assignment()?);
            return match expr {
                Expr::ComponentAccess { object, component, .. } => {
                    Ok(Expr::ComponentAssign { object, component, value, pos })
                }
                Expr::Variable { name, indices, member, .. } => {
                    Ok(Expr::Assign { name, indices, member, value, pos })
                }
                _ => Err(Diagnostic::syntax("invalid assignment target", pos, None)),
            };
        }

        Ok(expr)
    }

    fn or_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.and_expr()?;
        while self.check(TokenKind::Or) {
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.and_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op: BinaryOp::Or, right, pos };
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.eq_expr()?;
        while self.check(TokenKind::And) {
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.eq_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op: BinaryOp::And, right, pos };
        }
        Ok(expr)
    }

    fn eq_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.cmp_expr()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.cmp_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op, right, pos };
        }
        Ok(expr)
    }

    fn cmp_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.add_expr()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.add_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op, right, pos };
        }
        Ok(expr)
    }

    fn add_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.mul_expr()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.mul_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op, right, pos };
        }
        Ok(expr)
    }

    fn mul_expr(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.pow_expr()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Mod => BinaryOp::Mod,
                _ => break,
            };
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.pow_expr()?);
            expr = Expr::Binary { left: Box::new(expr), op, right, pos };
        }
        Ok(expr)
    }

    /// `^` binds tighter than `*`/`/`/`%` and is right-associative, the
    /// conventional precedence for exponentiation; the grammar in spec §4.3
    /// does not list it explicitly, so it is slotted directly above `mul`.
    fn pow_expr(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.unary()?;
        if self.check(TokenKind::Caret) {
            let pos = self.peek().position();
            self.advance();
            let right = Box::new(self.pow_expr()?);
            return Ok(Expr::Binary { left: Box::new(expr), op: BinaryOp::Pow, right, pos });
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let pos = self.peek().position();
            self.advance();
            let operand = Box::new(self.unary()?);
            return Ok(Expr::Unary { op, operand, pos });
        }
        self.postfix()
    }

    /// `primary ( "(" args? ")" | "{" args? "}" | "[" expr ("," expr)* "]" | "." IDENT )*`
    fn postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.primary()?;

        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    let pos = self.peek().position();
                    self.advance();
                    let arguments = self.arguments()?;
                    self.expect(TokenKind::RParen, "expected ')' after arguments")?;
                    let name = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => return Err(self.error("invalid function call")),
                    };
                    expr = Expr::Call { name, arguments, pos };
                }
                TokenKind::LBrace => {
                    let pos = self.peek().position();
                    self.advance();
                    let mut values = Vec::new();
                    if !self.check(TokenKind::RBrace) {
                        loop {
                            values.push(self.expression()?);
                            if !self.match_kind(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RBrace, "expected '}' after struct values")?;
                    let type_name = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => return Err(self.error("invalid struct literal")),
                    };
                    expr = Expr::StructLiteral { type_name, values, pos };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let mut indices = vec![self.expression()?];
                    while self.match_kind(TokenKind::Comma) {
                        indices.push(self.expression()?);
                    }
                    self.expect(TokenKind::RBracket, "expected ']' after array indices")?;
                    expr = match expr {
                        Expr::Variable { name, member, pos, .. } => {
                            Expr::Variable { name, indices, member, pos }
                        }
                        _ => return Err(self.error("invalid index target")),
                    };
                }
                TokenKind::Dot => {
                    let pos = self.peek().position();
                    self.advance();
                    let member = self.expect_identifier("expected member name after '.'")?;
                    if let Some(component) = Component::from_name(&member) {
                        expr = Expr::ComponentAccess { object: Box::new(expr), component, pos };
                    } else {
                        expr = match expr {
                            Expr::Variable { name, indices, pos, .. } => {
                                Expr::Variable { name, indices, member: Some(member), pos }
                            }
                            _ => return Err(self.error("invalid member access target")),
                        };
                    }
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, Diagnostic> {
        let pos = self.peek().position();

        match self.peek_kind() {
            TokenKind::Number => {
                let lexeme = self.advance().lexeme;
                let value = if lexeme.contains('.') {
                    Literal::Double(lexeme.parse().unwrap_or(0.0))
                } else {
                    Literal::Integer(lexeme.parse().unwrap_or(0))
                };
                Ok(Expr::Literal { value, pos })
            }
            TokenKind::String => {
                let lexeme = self.advance().lexeme;
                Ok(Expr::Literal { value: Literal::String(lexeme), pos })
            }
            TokenKind::Boolean => {
                let lexeme = self.advance().lexeme.to_ascii_lowercase();
                Ok(Expr::Literal { value: Literal::Boolean(lexeme == "true"), pos })
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal { value: Literal::Null, pos })
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                Ok(Expr::Variable { name, indices: Vec::new(), member: None, pos })
            }
            TokenKind::Vec2
            | TokenKind::Vec3
            | TokenKind::Vec4
            | TokenKind::Mat3
            | TokenKind::Mat4
            | TokenKind::Quat => {
                let kind = match self.advance().kind {
                    TokenKind::Vec2 => ConstructorKind::Vec2,
                    TokenKind::Vec3 => ConstructorKind::Vec3,
                    TokenKind::Vec4 => ConstructorKind::Vec4,
                    TokenKind::Mat3 => ConstructorKind::Mat3,
                    TokenKind::Mat4 => ConstructorKind::Mat4,
                    _ => ConstructorKind::Quat,
                };
                self.expect(TokenKind::LParen, "expected '(' after vector/matrix type")?;
                let arguments = self.arguments()?;
                self.expect(TokenKind::RParen, "expected ')' after constructor arguments")?;
                Ok(Expr::Constructor { kind, arguments, pos })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.error("expected expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(source: &str) -> Program {
        let tokens = braic_lexer::tokenize(source).unwrap();
        parse(tokens).unwrap_or_else(|errs| panic!("parse failed: {errs:?}"))
    }

    #[test]
    fn parses_var_decl_with_arithmetic() {
        let program = parse_ok("var x = 2 + 3 * 4;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::VarAssign { name, .. } => assert_eq!(name, "x"),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_counted_for_loop() {
        let program = parse_ok("for (var i = 0; i < 10; i = i + 1) { print(i); }");
        assert!(matches!(program.statements[0], Stmt::CountedFor { .. }));
    }

    #[test]
    fn parses_function_with_typed_params_and_return() {
        let program = parse_ok("function add(a as integer, b as integer) as integer { return a + b; }");
        match &program.statements[0] {
            Stmt::FunctionDecl { name, params, return_type, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(return_type, &Some(TypeTag::Integer));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_array_index_assignment() {
        let program = parse_ok("var arr[2] = 5;");
        match &program.statements[0] {
            Stmt::VarAssign { name, indices, .. } => {
                assert_eq!(name, "arr");
                assert_eq!(indices.len(), 1);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_struct_decl_and_literal() {
        let program = parse_ok("struct Point { x, y }; var p = Point { 1, 2 };");
        match &program.statements[0] {
            Stmt::StructDecl { name, field_names, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(field_names, &vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_component_access_and_assign() {
        let program = parse_ok("var v = vec3(1, 2, 3); v.x = 9;");
        match &program.statements[1] {
            Stmt::Expression { expr: Expr::ComponentAssign { component, .. }, .. } => {
                assert_eq!(*component, Component::X);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_ffi_declare_with_pointer_param() {
        let program = parse_ok(
            r#"declare ffi function SDL_CreateWindow from "SDL2" (title as string, flags as pointer) as pointer;"#,
        );
        assert!(matches!(program.statements[0], Stmt::FfiFunctionDecl { .. }));
    }

    #[test]
    fn invalid_assignment_target_is_a_syntax_error() {
        let tokens = braic_lexer::tokenize("1 + 2 = 3;").unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn error_recovery_finds_later_errors_in_the_same_file() {
        let tokens = braic_lexer::tokenize("var x = ;\nvar y = 1;\nvar z = ;").unwrap();
        let errors = parse(tokens).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
