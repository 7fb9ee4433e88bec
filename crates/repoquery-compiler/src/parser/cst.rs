//! Syntax kinds for method names.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! `MethodLang` implements Rowan's `Language` trait for tree construction.

use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Leading verb: `find`, `count`, `delete`, `exists`, `update`, `save`.
    Prefix = 0,
    KwFirst,
    /// Digit run, only meaningful after `First`.
    Number,
    KwBy,
    /// Capitalized spelling of a declared entity attribute.
    Attribute,
    KwNot,
    /// Any operator spelling from the grammar table (`Like`, `NotIn`, ...).
    Operator,
    KwAnd,
    KwOr,
    KwOrderBy,
    KwAsc,
    KwDesc,
    /// `Set` or `Add` in update methods.
    Assign,
    /// Fragment the lexer could not classify.
    Garbage,

    // --- Node kinds (non-terminals) ---
    Error,
    Root,
    Subject,
    FirstClause,
    Predicate,
    Condition,
    AndExpr,
    OrExpr,
    Updates,
    Assignment,
    OrderBy,
    SortTerm,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_token(self) -> bool {
        self < Error
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MethodLang {}

impl Language for MethodLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<MethodLang>;
pub type SyntaxToken = rowan::SyntaxToken<MethodLang>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// Tokens that can begin (or wrongly begin) a condition.
    pub const CONDITION_FIRST: TokenSet = TokenSet::new(&[Attribute, KwNot, Operator]);

    pub const JUNCTIONS: TokenSet = TokenSet::new(&[KwAnd, KwOr]);

    pub const DIRECTIONS: TokenSet = TokenSet::new(&[KwAsc, KwDesc]);
}
