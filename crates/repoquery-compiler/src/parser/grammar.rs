//! Grammar productions for method names.
//!
//! ```text
//! Root      = Subject [By [Predicate]] [Updates] [OrderBy]
//! Subject   = Prefix [First [Number]]
//! Predicate = Condition ((And | Or) Condition)*
//! Condition = Attribute [Not] [Operator]
//! Updates   = (Assign Attribute)+
//! OrderBy   = "OrderBy" (Attribute [Asc | Desc])+
//! ```

mod clauses;
mod conditions;

use repoquery_core::grammar::PrefixKind;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::{SyntaxKind, TokenSet};
use crate::parser::cst::token_sets::{CONDITION_FIRST, JUNCTIONS};

impl Parser<'_, '_> {
    pub(crate) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        let prefix = self.parse_subject();
        if prefix == Some(PrefixKind::Save) {
            if !self.eof() {
                self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "`save` takes nothing after the prefix",
                    TokenSet::EMPTY,
                );
            }
        } else {
            self.parse_body(prefix);
        }

        while !self.should_stop() {
            self.parse_stray_token();
        }

        self.finish_node();
    }

    /// `find` | `countBy...` | `findFirst10By...`
    fn parse_subject(&mut self) -> Option<PrefixKind> {
        self.start_node(SyntaxKind::Subject);

        let prefix = if self.currently_is(SyntaxKind::Prefix) {
            let prefix = self.grammar.prefix(self.current_text());
            self.bump();
            prefix
        } else {
            if self.currently_is(SyntaxKind::Garbage) {
                self.error_and_bump(DiagnosticKind::MissingPrefix);
            } else if self.eof() {
                self.error(DiagnosticKind::MissingPrefix);
            } else {
                let found = format!("found `{}`", self.current_text());
                self.error_msg(DiagnosticKind::MissingPrefix, found);
            }
            None
        };

        if self.currently_is(SyntaxKind::KwFirst) {
            self.parse_first(prefix);
        }

        self.finish_node();
        prefix
    }

    /// `First` [Number]
    fn parse_first(&mut self, prefix: Option<PrefixKind>) {
        self.assert_current(SyntaxKind::KwFirst);
        if let Some(prefix) = prefix.filter(|p| !p.is_find()) {
            self.error_msg(
                DiagnosticKind::MisplacedFirst,
                format!("found on a `{prefix}` method"),
            );
        }

        self.start_node(SyntaxKind::FirstClause);
        self.bump();
        self.eat_token(SyntaxKind::Number);
        self.finish_node();
    }

    fn parse_body(&mut self, prefix: Option<PrefixKind>) {
        if self.eat_token(SyntaxKind::KwBy) {
            if self.currently_is_one_of(CONDITION_FIRST) {
                self.parse_predicate();
            } else if !self.currently_is(SyntaxKind::KwOrderBy) {
                self.error_msg(
                    DiagnosticKind::ExpectedCondition,
                    "`By` must be followed by a condition",
                );
            }
        } else if self.currently_is_one_of(CONDITION_FIRST.union(JUNCTIONS)) {
            self.error(DiagnosticKind::MissingBy);
            self.parse_predicate();
        }

        if prefix == Some(PrefixKind::Update) || self.currently_is(SyntaxKind::Assign) {
            self.parse_updates(prefix);
        }

        if self.currently_is(SyntaxKind::KwOrderBy) {
            self.parse_order_by();
        }
    }

    /// Anything left after the last clause.
    fn parse_stray_token(&mut self) {
        let text = self.current_text();
        match self.current() {
            SyntaxKind::Number => {
                self.error_and_bump_msg(DiagnosticKind::MisplacedNumber, format!("found `{text}`"))
            }
            SyntaxKind::KwAsc | SyntaxKind::KwDesc => self.error_and_bump_msg(
                DiagnosticKind::UnexpectedToken,
                format!("`{text}` outside `OrderBy`"),
            ),
            _ => self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, format!("`{text}`")),
        }
    }
}
