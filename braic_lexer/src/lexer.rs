use braic_diagnostic::Diagnostic;
use braic_ir::{Position, Token, TokenKind};

use crate::cursor::Cursor;
use crate::keywords;

/// Converts `source` into a token sequence ending in an `Eof` token, per
/// spec §4.2. Fails only when a string literal runs past end-of-file;
/// unrecognized characters become `Invalid` tokens for the parser to reject
/// (so multiple lexical issues in one file still all surface, one per
/// malformed statement, via the parser's recovery).
pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        skip_trivia(&mut cursor);
        if cursor.is_at_end() {
            tokens.push(Token::new(TokenKind::Eof, "", cursor.line(), cursor.column()));
            break;
        }

        let line = cursor.line();
        let column = cursor.column();
        let c = cursor.peek(0);

        let token = if c.is_ascii_digit() {
            make_number(&mut cursor, line, column)
        } else if c == '"' {
            make_string(&mut cursor, line, column)?
        } else if is_ident_start(c) {
            make_identifier(&mut cursor, line, column)
        } else {
            make_operator(&mut cursor, line, column)
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Skips whitespace (including newlines — the language is brace-delimited,
/// not line-delimited) and `//`/`/* */` comments.
fn skip_trivia(cursor: &mut Cursor) {
    loop {
        match cursor.peek(0) {
            ' ' | '\t' | '\r' | '\n' => {
                cursor.advance();
            }
            '/' if cursor.peek(1) == '/' => {
                while cursor.peek(0) != '\n' && !cursor.is_at_end() {
                    cursor.advance();
                }
            }
            '/' if cursor.peek(1) == '*' => {
                cursor.advance();
                cursor.advance();
                while !cursor.is_at_end() && !(cursor.peek(0) == '*' && cursor.peek(1) == '/') {
                    cursor.advance();
                }
                if !cursor.is_at_end() {
                    cursor.advance();
                    cursor.advance();
                }
            }
            _ => break,
        }
    }
}

/// A run of digits optionally containing a single `.`; the parser (not the
/// lexer) decides integer vs double from the lexeme's presence of a dot,
/// per spec §4.2.
fn make_number(cursor: &mut Cursor, line: u32, column: u32) -> Token {
    let mut lexeme = String::new();
    let mut seen_dot = false;
    while cursor.peek(0).is_ascii_digit() || (cursor.peek(0) == '.' && !seen_dot && cursor.peek(1).is_ascii_digit()) {
        if cursor.peek(0) == '.' {
            seen_dot = true;
        }
        lexeme.push(cursor.advance());
    }
    Token::new(TokenKind::Number, lexeme, line, column)
}

fn make_string(cursor: &mut Cursor, line: u32, column: u32) -> Result<Token, Diagnostic> {
    cursor.advance(); // opening quote
    let mut lexeme = String::new();
    loop {
        if cursor.is_at_end() {
            return Err(Diagnostic::syntax(
                "unterminated string literal",
                Position::new(line, column),
                None,
            ));
        }
        match cursor.peek(0) {
            '"' => {
                cursor.advance();
                break;
            }
            '\\' => {
                cursor.advance();
                if cursor.is_at_end() {
                    return Err(Diagnostic::syntax(
                        "unterminated string literal",
                        Position::new(line, column),
                        None,
                    ));
                }
                let escaped = cursor.advance();
                lexeme.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    other => other,
                });
            }
            _ => lexeme.push(cursor.advance()),
        }
    }
    Ok(Token::new(TokenKind::String, lexeme, line, column))
}

fn make_identifier(cursor: &mut Cursor, line: u32, column: u32) -> Token {
    let mut lexeme = String::new();
    while is_ident_continue(cursor.peek(0)) {
        lexeme.push(cursor.advance());
    }
    let lower = lexeme.to_ascii_lowercase();
    match keywords::lookup(&lower) {
        Some(kind) => Token::new(kind, lexeme, line, column),
        None => Token::new(TokenKind::Identifier, lexeme, line, column),
    }
}

fn make_operator(cursor: &mut Cursor, line: u32, column: u32) -> Token {
    let c = cursor.advance();
    let (kind, lexeme) = match c {
        '=' if cursor.peek(0) == '=' => {
            cursor.advance();
            (TokenKind::Eq, "==".to_string())
        }
        '<' if cursor.peek(0) == '=' => {
            cursor.advance();
            (TokenKind::LtEq, "<=".to_string())
        }
        '>' if cursor.peek(0) == '=' => {
            cursor.advance();
            (TokenKind::GtEq, ">=".to_string())
        }
        '<' if cursor.peek(0) == '>' => {
            cursor.advance();
            (TokenKind::NotEq, "<>".to_string())
        }
        '!' if cursor.peek(0) == '=' => {
            cursor.advance();
            (TokenKind::NotEq, "!=".to_string())
        }
        '=' => (TokenKind::Assign, "=".to_string()),
        '<' => (TokenKind::Lt, "<".to_string()),
        '>' => (TokenKind::Gt, ">".to_string()),
        '+' => (TokenKind::Plus, "+".to_string()),
        '-' => (TokenKind::Minus, "-".to_string()),
        '*' => (TokenKind::Star, "*".to_string()),
        '/' => (TokenKind::Slash, "/".to_string()),
        '%' => (TokenKind::Percent, "%".to_string()),
        '^' => (TokenKind::Caret, "^".to_string()),
        '(' => (TokenKind::LParen, "(".to_string()),
        ')' => (TokenKind::RParen, ")".to_string()),
        '[' => (TokenKind::LBracket, "[".to_string()),
        ']' => (TokenKind::RBracket, "]".to_string()),
        '{' => (TokenKind::LBrace, "{".to_string()),
        '}' => (TokenKind::RBrace, "}".to_string()),
        ',' => (TokenKind::Comma, ",".to_string()),
        ';' => (TokenKind::Semicolon, ";".to_string()),
        ':' => (TokenKind::Colon, ":".to_string()),
        '.' => (TokenKind::Dot, ".".to_string()),
        other => (TokenKind::Invalid, other.to_string()),
    };
    Token::new(kind, lexeme, line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_integer_arithmetic() {
        assert_eq!(
            kinds("var x = 2 + 3 * 4;"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(kinds("VAR IF")[0], TokenKind::Var);
        assert_eq!(kinds("VAR IF")[1], TokenKind::If);
    }

    #[test]
    fn identifier_casing_is_preserved() {
        let tokens = tokenize("var MyVar = 1;").unwrap();
        assert_eq!(tokens[1].lexeme, "MyVar");
    }

    #[test]
    fn not_equal_has_two_spellings() {
        assert_eq!(kinds("<>")[0], TokenKind::NotEq);
        assert_eq!(kinds("!=")[0], TokenKind::NotEq);
    }

    #[test]
    fn string_escapes_are_interpreted() {
        let tokens = tokenize(r#""a\nb\"c""#).unwrap();
        assert_eq!(tokens[0].lexeme, "a\nb\"c");
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        assert!(tokenize("\"unterminated").is_err());
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(kinds("var x = 1; // trailing\nvar y = 2;").len(), 11);
    }

    #[test]
    fn block_comments_are_skipped() {
        let tokens = tokenize("var /* comment */ x = 1;").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn true_and_false_are_boolean_literals() {
        let tokens = tokenize("true false").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Boolean);
        assert_eq!(tokens[1].kind, TokenKind::Boolean);
    }

    #[test]
    fn positions_are_monotone_non_decreasing() {
        let tokens = tokenize("var x = 1;\nvar y = 2;").unwrap();
        let mut last = (0u32, 0u32);
        for t in &tokens {
            assert!((t.line, t.column) >= last);
            last = (t.line, t.column);
        }
    }
}
