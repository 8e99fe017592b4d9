use braic_ir::TokenKind;

const _: () = assert!(
    TokenKind::MAX_DISCRIMINANT <= 63,
    "TokenSet uses a u64 bitset; all discriminant indices must be < 64"
);

/// A set of token kinds with O(1) membership testing via a `u64` bitset.
///
/// Grounded on the teacher's `ori_parse::recovery::TokenSet`, which uses the
/// same bitset-over-discriminant-index technique but backed by `u128` to
/// cover a much larger token alphabet. braic has under 60 token kinds, so a
/// `u64` is both sufficient and the natural machine word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u64 << kind.discriminant_index()))
    }

    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u64 << kind.discriminant_index())) != 0
    }
}

/// The set of tokens that may begin a top-level statement, per the grammar
/// in spec §4.3. Used to resynchronize after a reported syntax error: the
/// parser advances past tokens until it sees a semicolon or one of these.
pub const STATEMENT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Var)
    .with(TokenKind::If)
    .with(TokenKind::For)
    .with(TokenKind::While)
    .with(TokenKind::Return)
    .with(TokenKind::Function)
    .with(TokenKind::Struct)
    .with(TokenKind::Dim)
    .with(TokenKind::Declare)
    .with(TokenKind::Ffi)
    .with(TokenKind::Import);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_start_contains_expected_keywords() {
        assert!(STATEMENT_START.contains(TokenKind::If));
        assert!(STATEMENT_START.contains(TokenKind::Dim));
        assert!(!STATEMENT_START.contains(TokenKind::Plus));
    }
}
