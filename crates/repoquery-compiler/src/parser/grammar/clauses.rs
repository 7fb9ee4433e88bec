use repoquery_core::grammar::PrefixKind;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::DIRECTIONS;

impl Parser<'_, '_> {
    /// `Set<Attr>Add<Attr>...`, only on `update` methods.
    pub(crate) fn parse_updates(&mut self, prefix: Option<PrefixKind>) {
        if !self.currently_is(SyntaxKind::Assign) {
            self.error(DiagnosticKind::ExpectedAssignment);
            return;
        }
        if let Some(prefix) = prefix.filter(|p| *p != PrefixKind::Update) {
            self.error_msg(
                DiagnosticKind::AssignmentWithoutUpdate,
                format!("found on a `{prefix}` method"),
            );
        }

        self.start_node(SyntaxKind::Updates);
        while self.currently_is(SyntaxKind::Assign) && !self.has_fatal_error() {
            self.start_node(SyntaxKind::Assignment);
            let op = self.current_text();
            self.bump();
            if !self.eat_token(SyntaxKind::Attribute) {
                self.error_msg(
                    DiagnosticKind::ExpectedAttribute,
                    format!("`{op}` must name an attribute"),
                );
            }
            self.finish_node();
        }
        self.finish_node();
    }

    /// `OrderBy` (Attribute [Asc | Desc])+
    pub(crate) fn parse_order_by(&mut self) {
        self.assert_current(SyntaxKind::KwOrderBy);
        self.start_node(SyntaxKind::OrderBy);
        self.bump();

        if !self.currently_is(SyntaxKind::Attribute) {
            self.error(DiagnosticKind::ExpectedSortAttribute);
        }

        while self.currently_is(SyntaxKind::Attribute) && !self.has_fatal_error() {
            self.start_node(SyntaxKind::SortTerm);
            self.bump();
            if self.currently_is_one_of(DIRECTIONS) {
                self.bump();
            }
            self.finish_node();
        }

        self.finish_node();
    }
}
