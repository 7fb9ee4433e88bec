//! Keyword lexer for method names.
//!
//! Produces span-based tokens without storing text - text is sliced from the
//! method name only when needed.
//!
//! Lexing happens in two steps:
//! 1. `logos` splits the name into camel-case fragments (`find`, `Year`, `Hired`, `25`)
//! 2. Runs of fragments are matched against the grammar's keyword spellings and
//!    the entity's attribute spellings, longest match first. A match must end on
//!    a fragment boundary, so `Order` never matches inside `Ordinal`.
//!
//! ## Error handling
//!
//! Unrecognized fragments become `Garbage` tokens and lexing continues, so every
//! bad fragment of a name is reported at once. Consecutive unrecognized
//! characters (`_`, `$`) are coalesced into a single fragment.

use std::ops::Range;

use logos::Logos;
use repoquery_core::AttributeIndex;
use repoquery_core::grammar::{Grammar, Keyword, PrefixKind};
use rowan::TextRange;

use super::cst::SyntaxKind;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Camel-case fragment of a method name.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[regex("[a-z]+")]
    Lower,

    #[regex("[A-Z][a-z]*")]
    Word,

    #[regex("[0-9]+")]
    Digits,

    /// Coalesced unrecognized characters
    Garbage,
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Splits a method name into camel-case fragments.
///
/// Consecutive lexer errors are coalesced into single `Garbage` fragments.
pub fn fragments(source: &str) -> Vec<(Fragment, Range<usize>)> {
    let mut out = Vec::new();
    let mut lexer = Fragment::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    out.push((Fragment::Garbage, start..lexer.span().start));
                }
                out.push((kind, lexer.span()));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    out.push((Fragment::Garbage, start..source.len()));
                }
                break;
            }
        }
    }

    out
}

/// Tokenizes a method name against a grammar table and an attribute set.
pub fn lex(source: &str, grammar: &Grammar, attributes: &AttributeIndex) -> LexResult {
    let fragments = fragments(source);
    let mut boundaries: Vec<usize> = fragments.iter().map(|(_, range)| range.start).collect();
    boundaries.push(source.len());

    let lexer = Lexer {
        source,
        grammar,
        attributes,
        fragments,
        boundaries,
        tokens: Vec::new(),
        diagnostics: Diagnostics::new(),
    };
    lexer.run()
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

struct Lexer<'a> {
    source: &'a str,
    grammar: &'a Grammar,
    attributes: &'a AttributeIndex,
    fragments: Vec<(Fragment, Range<usize>)>,
    /// Sorted fragment start offsets plus the end of input.
    boundaries: Vec<usize>,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
}

impl Lexer<'_> {
    fn run(mut self) -> LexResult {
        let mut idx = self.lex_prefix();
        while idx < self.fragments.len() {
            idx = self.step(idx);
        }
        LexResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// The leading lower-case fragment must be a prefix. Anything else is left
    /// to the parser, which reports the missing prefix.
    fn lex_prefix(&mut self) -> usize {
        let Some((Fragment::Lower, range)) = self.fragments.first().cloned() else {
            return 0;
        };
        let source = self.source;
        let text = &source[range.clone()];
        if self.grammar.prefix(text).is_some() {
            self.push(SyntaxKind::Prefix, range);
        } else {
            let prefixes: Vec<_> = PrefixKind::ALL
                .iter()
                .map(|p| format!("`{}`", p.as_str()))
                .collect();
            self.diagnostics
                .report(DiagnosticKind::UnknownFragment, range_to_text_range(range.clone()))
                .message(text)
                .hint(format!("method names start with one of {}", prefixes.join(", ")))
                .emit();
            self.push(SyntaxKind::Garbage, range);
        }
        1
    }

    /// Lex one token starting at fragment `idx`; returns the next fragment index.
    fn step(&mut self, idx: usize) -> usize {
        let (fragment, range) = self.fragments[idx].clone();
        if fragment == Fragment::Garbage {
            return self.unknown(idx, range);
        }

        let source = self.source;
        let start = range.start;
        let rest = &source[start..];

        let attributes: Vec<(usize, usize)> = self
            .attributes
            .prefixes_of(rest)
            .filter(|(spelling, _)| self.is_boundary(start + spelling.len()))
            .map(|(spelling, names)| (spelling.len(), names.len()))
            .collect();
        let keywords = self.keywords_at(start);

        if let Some(&(len, _)) = keywords
            .iter()
            .find(|(len, _)| attributes.iter().any(|(a, _)| a == len))
        {
            let spelling = &rest[..len];
            return self.ambiguous(
                start..start + len,
                format!("`{spelling}` is both a keyword and an attribute"),
            );
        }

        let longest_attr = attributes.iter().copied().max_by_key(|(len, _)| *len);
        let longest_kw = keywords.iter().copied().max_by_key(|(len, _)| *len);

        match (longest_attr, longest_kw) {
            (Some((len, matches)), kw) if kw.is_none_or(|(kw_len, _)| len > kw_len) => {
                let spelling = &rest[..len];
                if matches > 1 {
                    let names: Vec<_> = self
                        .attributes
                        .lookup(spelling)
                        .iter()
                        .map(|a| format!("`{a}`"))
                        .collect();
                    return self.ambiguous(
                        start..start + len,
                        format!("`{spelling}` matches attributes {}", names.join(" and ")),
                    );
                }
                if let Some(shorter) = self.split_reading(start, len, &attributes) {
                    let (head, tail) = (&rest[..shorter], &rest[shorter..len]);
                    return self.ambiguous(
                        start..start + len,
                        format!(
                            "`{spelling}` could also be read as attribute `{head}` followed by `{tail}`"
                        ),
                    );
                }
                if let Some(keyword) = self.keyword_reading(start, len) {
                    let (head, tail) = (&rest[..keyword], &rest[keyword..len]);
                    return self.ambiguous(
                        start..start + len,
                        format!(
                            "`{spelling}` could also be read as `{head}` followed by attribute `{tail}`"
                        ),
                    );
                }
                self.push(SyntaxKind::Attribute, start..start + len);
                self.fragment_at(start + len)
            }
            (_, Some((len, keyword))) => {
                self.push(keyword_kind(keyword), start..start + len);
                self.fragment_at(start + len)
            }
            (None, None) if fragment == Fragment::Digits => {
                self.push(SyntaxKind::Number, range.clone());
                idx + 1
            }
            _ => self.unknown(idx, range),
        }
    }

    /// Keyword spellings matching at `start` and ending on a fragment boundary.
    fn keywords_at(&self, start: usize) -> Vec<(usize, Keyword)> {
        let rest = &self.source[start..];
        self.grammar
            .keywords()
            .filter(|(spelling, _)| {
                rest.starts_with(spelling) && self.is_boundary(start + spelling.len())
            })
            .map(|(spelling, keyword)| (spelling.len(), keyword))
            .collect()
    }

    /// A shorter attribute match immediately followed by a keyword inside the
    /// longest match makes the name readable two ways.
    fn split_reading(&self, start: usize, len: usize, attributes: &[(usize, usize)]) -> Option<usize> {
        attributes
            .iter()
            .map(|(a, _)| *a)
            .filter(|a| *a < len)
            .find(|a| !self.keywords_at(start + a).is_empty())
    }

    /// A keyword inside the longest match, followed by the rest of it as an
    /// attribute, makes the name readable two ways.
    fn keyword_reading(&self, start: usize, len: usize) -> Option<usize> {
        let spelling = &self.source[start..start + len];
        self.keywords_at(start)
            .into_iter()
            .map(|(k, _)| k)
            .filter(|k| *k < len)
            .find(|k| !self.attributes.lookup(&spelling[*k..]).is_empty())
    }

    fn unknown(&mut self, idx: usize, range: Range<usize>) -> usize {
        let source = self.source;
        let text = &source[range.clone()];
        self.diagnostics
            .report(DiagnosticKind::UnknownFragment, range_to_text_range(range.clone()))
            .message(text)
            .emit();
        self.push(SyntaxKind::Garbage, range);
        idx + 1
    }

    fn ambiguous(&mut self, range: Range<usize>, message: String) -> usize {
        self.diagnostics
            .report(DiagnosticKind::AmbiguousToken, range_to_text_range(range.clone()))
            .message(message)
            .emit();
        let end = range.end;
        self.push(SyntaxKind::Garbage, range);
        self.fragment_at(end)
    }

    fn push(&mut self, kind: SyntaxKind, range: Range<usize>) {
        self.tokens.push(Token::new(kind, range_to_text_range(range)));
    }

    fn is_boundary(&self, offset: usize) -> bool {
        self.boundaries.binary_search(&offset).is_ok()
    }

    /// Index of the fragment starting at `offset` (or `len` at end of input).
    fn fragment_at(&self, offset: usize) -> usize {
        self.fragments
            .partition_point(|(_, range)| range.start < offset)
    }
}

fn keyword_kind(keyword: Keyword) -> SyntaxKind {
    match keyword {
        Keyword::By => SyntaxKind::KwBy,
        Keyword::And => SyntaxKind::KwAnd,
        Keyword::Or => SyntaxKind::KwOr,
        Keyword::Not => SyntaxKind::KwNot,
        Keyword::OrderBy => SyntaxKind::KwOrderBy,
        Keyword::Asc => SyntaxKind::KwAsc,
        Keyword::Desc => SyntaxKind::KwDesc,
        Keyword::First => SyntaxKind::KwFirst,
        Keyword::Operator => SyntaxKind::Operator,
        Keyword::Assign => SyntaxKind::Assign,
    }
}
