use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{CONDITION_FIRST, JUNCTIONS};

impl Parser<'_, '_> {
    /// Conditions joined by `And`/`Or`, associating left to right.
    ///
    /// Each junction retroactively wraps everything parsed so far:
    /// `A And B Or C` becomes `OrExpr(AndExpr(A, B), C)`.
    pub(crate) fn parse_predicate(&mut self) {
        self.start_node(SyntaxKind::Predicate);
        let checkpoint = self.checkpoint();

        if self.currently_is_one_of(CONDITION_FIRST) {
            self.parse_condition();
        } else {
            self.error(DiagnosticKind::ExpectedCondition);
        }

        while self.currently_is_one_of(JUNCTIONS) && !self.has_fatal_error() {
            let kind = if self.currently_is(SyntaxKind::KwAnd) {
                SyntaxKind::AndExpr
            } else {
                SyntaxKind::OrExpr
            };
            let junction = self.current_text();

            self.start_node_at(checkpoint, kind);
            self.bump();
            if self.currently_is_one_of(CONDITION_FIRST) {
                self.parse_condition();
            } else {
                self.error_msg(
                    DiagnosticKind::ExpectedCondition,
                    format!("`{junction}` must be followed by a condition"),
                );
            }
            self.finish_node();
        }

        self.finish_node();
    }

    /// `Attribute [Not] [Operator]`; a missing operator means equality.
    fn parse_condition(&mut self) {
        self.start_node(SyntaxKind::Condition);

        if !self.eat_token(SyntaxKind::Attribute) {
            let found = format!("found `{}`", self.current_text());
            self.error_msg(DiagnosticKind::ExpectedAttribute, found);
        }

        let negated_by_keyword = self.eat_token(SyntaxKind::KwNot);

        if self.currently_is(SyntaxKind::Operator) {
            let spelling = self.current_text();
            let negated_spelling = self
                .grammar
                .operator(spelling)
                .is_some_and(|spec| spec.negated);
            if negated_by_keyword && negated_spelling {
                self.error_msg(DiagnosticKind::DoubleNegation, spelling);
            }
            self.bump();
        }

        self.finish_node();
    }
}
