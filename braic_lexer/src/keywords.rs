use braic_ir::TokenKind;

/// Case-insensitive keyword lookup table (spec §4.2). Anything not in this
/// table becomes an `Identifier` with its original casing preserved.
pub fn lookup(lower: &str) -> Option<TokenKind> {
    Some(match lower {
        "var" => TokenKind::Var,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "dim" => TokenKind::Dim,
        "struct" => TokenKind::Struct,
        "as" => TokenKind::As,
        "declare" => TokenKind::Declare,
        "lib" => TokenKind::Lib,
        "ffi" => TokenKind::Ffi,
        "from" => TokenKind::From,
        "import" => TokenKind::Import,
        "mod" => TokenKind::Mod,
        "pointer" => TokenKind::Pointer,
        "vec2" => TokenKind::Vec2,
        "vec3" => TokenKind::Vec3,
        "vec4" => TokenKind::Vec4,
        "mat3" => TokenKind::Mat3,
        "mat4" => TokenKind::Mat4,
        "quat" => TokenKind::Quat,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "null" => TokenKind::Null,
        "true" | "false" => TokenKind::Boolean,
        _ => return None,
    })
}
