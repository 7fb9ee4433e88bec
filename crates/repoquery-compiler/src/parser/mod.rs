//! Parser infrastructure for method names.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy lexing: tokens carry spans, text sliced only when building tree nodes
//! - Grammar-driven lexing: keyword and attribute spellings come from tables, not regexes
//! - Checkpoint-based wrapping: junctions retroactively wrap the conditions before them
//! - Explicit recovery sets: per-production sets determine when to bail vs consume
//!
//! # Recovery Strategy
//!
//! The parser is resilient - it always produces a tree. Recovery follows these rules:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Tokens left after the last clause are reported one by one
//!
//! However, fuel exhaustion returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod tests;

use std::fmt::Write;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    AndExpr, Assignment, Condition, Expr, FirstClause, OrExpr, OrderBy, Predicate, Root, SortTerm,
    Subject, Updates,
};

pub use core::{ParseResult, Parser};

use repoquery_core::grammar::Grammar;
use rowan::NodeOrToken;

use crate::PassResult;
use lexer::Token;

/// Main entry point. Returns Err on fuel exhaustion.
pub fn parse(
    source: &str,
    tokens: Vec<Token>,
    grammar: &Grammar,
    exec_fuel: Option<u32>,
) -> PassResult<Root> {
    let result = Parser::new(source, tokens, grammar)
        .with_exec_fuel(exec_fuel)
        .parse()?;
    tracing::trace!(
        fuel = result.exec_fuel_consumed,
        errors = result.diagnostics.error_count(),
        "parsed method name"
    );
    Ok((result.root, result.diagnostics))
}

/// Indented CST dump: nodes as `Kind`, tokens as `Kind "text"`.
pub fn dump(node: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out
}

fn dump_node(node: &SyntaxNode, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let _ = writeln!(out, "{prefix}{:?}", node.kind());
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => dump_node(&n, indent + 1, out),
            NodeOrToken::Token(t) => {
                let _ = writeln!(out, "{prefix}  {:?} {:?}", t.kind(), t.text());
            }
        }
    }
}
