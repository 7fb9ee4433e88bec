//! Positional parameter binding.
//!
//! Walks the typed AST of a well-formed method name and hands out parameters
//! in declaration order:
//! 1. Conditions, pre-order and left to right, each taking as many parameters
//!    as its operator's arity needs (`Between` two, `In` one collection, `Null` none)
//! 2. `Set`/`Add` assignments, one parameter each
//! 3. Whatever is left: `Limit`, `Sort`, `Pageable` directives and the saved entity
//!
//! Attribute names are resolved here; whether they fit their operators is
//! left to validation.


use repoquery_core::grammar::{AssignOp, Grammar, OperatorSpec, PrefixKind};
use repoquery_core::{AttributeIndex, AttributeName};
use rowan::{TextRange, TextSize};

use crate::PassResult;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::{self, Expr, Root};
use crate::parser::cst::{SyntaxKind, SyntaxToken};
use crate::plan::Direction;
use crate::signature::{MethodSignature, ParamKind};

/// A method name with every parameter assigned a role.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    pub prefix: PrefixKind,
    /// Span of the prefix token.
    pub prefix_span: TextRange,
    pub first: Option<BoundFirst>,
    pub predicate: Option<BoundPredicate>,
    pub assignments: Vec<BoundAssignment>,
    pub order_by: Vec<BoundSortTerm>,
    /// `Limit`, `Sort`, `Sort...` and `Pageable` parameters in declaration order.
    pub directives: Vec<BoundDirective>,
    pub entity: Option<usize>,
    /// Zero-width span at the end of the method name, for parameter-level problems.
    pub end: TextRange,
}

/// `First` clause; the count text is checked during validation.
#[derive(Debug, Clone)]
pub struct BoundFirst {
    pub span: TextRange,
    pub number: Option<String>,
}

/// Attribute reference as written in the method name.
#[derive(Debug, Clone)]
pub struct BoundAttribute {
    pub span: TextRange,
    pub spelling: String,
    /// `None` when the spelling names no single attribute.
    pub name: Option<AttributeName>,
}

#[derive(Debug, Clone)]
pub struct BoundCondition {
    pub span: TextRange,
    pub attribute: BoundAttribute,
    pub operator: OperatorSpec,
    /// Span of the operator spelling; `None` for implicit equality.
    pub operator_span: Option<TextRange>,
    /// `Not` keyword or negated spelling.
    pub negated: bool,
    pub operands: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Junction {
    And,
    Or,
}

#[derive(Debug, Clone)]
pub enum BoundPredicate {
    Condition(BoundCondition),
    Junction {
        kind: Junction,
        keyword: TextRange,
        lhs: Box<BoundPredicate>,
        rhs: Box<BoundPredicate>,
    },
}

impl BoundPredicate {
    /// Conditions in source order.
    pub fn conditions(&self) -> Vec<&BoundCondition> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Condition(c) => out.push(c),
                Self::Junction { lhs, rhs, .. } => {
                    stack.push(rhs);
                    stack.push(lhs);
                }
            }
        }
        out
    }

    /// Junction keywords in source order.
    pub fn junctions(&self) -> Vec<(Junction, TextRange)> {
        let mut out = Vec::new();
        self.collect_junctions(&mut out);
        out
    }

    fn collect_junctions(&self, out: &mut Vec<(Junction, TextRange)>) {
        if let Self::Junction {
            kind,
            keyword,
            lhs,
            rhs,
        } = self
        {
            lhs.collect_junctions(out);
            out.push((*kind, *keyword));
            rhs.collect_junctions(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundAssignment {
    pub span: TextRange,
    pub op: AssignOp,
    pub attribute: BoundAttribute,
    pub param: usize,
}

#[derive(Debug, Clone)]
pub struct BoundSortTerm {
    pub span: TextRange,
    pub attribute: BoundAttribute,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundDirective {
    pub index: usize,
    pub kind: ParamKind,
}

/// Bind the parameters of `signature` to the parsed method name.
///
/// `root` must come from a parse without errors.
pub fn bind(
    root: &Root,
    signature: &MethodSignature,
    grammar: &Grammar,
    attributes: &AttributeIndex,
) -> PassResult<BoundMethod> {
    let mut binder = Binder {
        signature,
        grammar,
        attributes,
        next: 0,
        end: TextRange::empty(TextSize::of(signature.name.as_str())),
        diagnostics: Diagnostics::new(),
    };
    let bound = binder.bind_root(root);
    tracing::trace!(
        method = %signature.name,
        directives = bound.directives.len(),
        errors = binder.diagnostics.error_count(),
        "bound parameters"
    );
    Ok((bound, binder.diagnostics))
}

struct Binder<'a> {
    signature: &'a MethodSignature,
    grammar: &'a Grammar,
    attributes: &'a AttributeIndex,
    /// Next unbound parameter.
    next: usize,
    end: TextRange,
    diagnostics: Diagnostics,
}

impl Binder<'_> {
    fn bind_root(&mut self, root: &Root) -> BoundMethod {
        let subject = root.subject();
        let prefix_token = subject.as_ref().and_then(|s| s.prefix());
        let prefix = prefix_token
            .as_ref()
            .and_then(|t| self.grammar.prefix(t.text()));
        let prefix_span = prefix_token.as_ref().map_or(self.end, |t| t.text_range());
        let prefix = match prefix {
            Some(prefix) => prefix,
            None => {
                self.diagnostics
                    .report(DiagnosticKind::MissingPrefix, prefix_span)
                    .emit();
                PrefixKind::Find
            }
        };

        let first = subject.and_then(|s| s.first()).map(|first| BoundFirst {
            span: first.as_cst().text_range(),
            number: first.count().map(|t| t.text().to_string()),
        });

        let predicate = root
            .predicate()
            .and_then(|p| p.expr())
            .and_then(|expr| self.bind_expr(&expr));

        let assignments = root
            .updates()
            .map(|u| u.assignments().filter_map(|a| self.bind_assignment(&a)).collect())
            .unwrap_or_default();

        let order_by = root
            .order_by()
            .map(|o| o.terms().filter_map(|t| self.bind_sort_term(&t)).collect())
            .unwrap_or_default();

        let mut bound = BoundMethod {
            prefix,
            prefix_span,
            first,
            predicate,
            assignments,
            order_by,
            directives: Vec::new(),
            entity: None,
            end: self.end,
        };
        self.bind_trailing(&mut bound);
        bound
    }

    fn bind_expr(&mut self, expr: &Expr) -> Option<BoundPredicate> {
        match expr {
            Expr::Condition(c) => self.bind_condition(c).map(BoundPredicate::Condition),
            Expr::And(j) => {
                let keyword = j.keyword()?.text_range();
                self.bind_junction(Junction::And, keyword, j.lhs(), j.rhs())
            }
            Expr::Or(j) => {
                let keyword = j.keyword()?.text_range();
                self.bind_junction(Junction::Or, keyword, j.lhs(), j.rhs())
            }
        }
    }

    fn bind_junction(
        &mut self,
        kind: Junction,
        keyword: TextRange,
        lhs: Option<Expr>,
        rhs: Option<Expr>,
    ) -> Option<BoundPredicate> {
        // Left first: operands bind in source order.
        let lhs = self.bind_expr(&lhs?)?;
        let rhs = self.bind_expr(&rhs?)?;
        Some(BoundPredicate::Junction {
            kind,
            keyword,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn bind_condition(&mut self, condition: &ast::Condition) -> Option<BoundCondition> {
        let attribute = self.resolve(&condition.attribute()?);
        let span = condition.as_cst().text_range();

        let operator_token = condition.operator();
        let operator = match &operator_token {
            Some(token) => self.grammar.operator(token.text())?.clone(),
            None => self.grammar.implicit_operator().clone(),
        };
        let negated = condition.not_token().is_some() != operator.negated;

        let wanted = operator.arity.operand_params();
        let left = self.signature.parameters.len().saturating_sub(self.next);
        let mut operands = Vec::with_capacity(wanted);
        for _ in 0..wanted.min(left) {
            if let Some(index) = self.take_operand(span, &attribute.spelling) {
                operands.push(index);
            }
        }
        if left < wanted {
            let spelling = operator_token
                .as_ref()
                .map_or(attribute.spelling.clone(), |t| {
                    format!("{}{}", attribute.spelling, t.text())
                });
            self.diagnostics
                .report(DiagnosticKind::MissingOperand, span)
                .message(format!(
                    "`{spelling}` needs {}, {left} left",
                    parameters(wanted)
                ))
                .emit();
        }

        Some(BoundCondition {
            span,
            attribute,
            operator,
            operator_span: operator_token.map(|t| t.text_range()),
            negated,
            operands,
        })
    }

    fn bind_assignment(&mut self, assignment: &ast::Assignment) -> Option<BoundAssignment> {
        let op = self.grammar.assignment(assignment.op()?.text())?;
        let attribute = self.resolve(&assignment.attribute()?);
        let span = assignment.as_cst().text_range();
        let Some(param) = self.take_operand(span, &attribute.spelling) else {
            self.diagnostics
                .report(DiagnosticKind::MissingOperand, span)
                .message(format!("`{op}{}` needs a value", attribute.spelling))
                .emit();
            return None;
        };
        Some(BoundAssignment {
            span,
            op,
            attribute,
            param,
        })
    }

    fn bind_sort_term(&mut self, term: &ast::SortTerm) -> Option<BoundSortTerm> {
        let attribute = self.resolve(&term.attribute()?);
        let direction = match term.direction().map(|t| t.kind()) {
            Some(SyntaxKind::KwDesc) => Direction::Desc,
            _ => Direction::Asc,
        };
        Some(BoundSortTerm {
            span: term.as_cst().text_range(),
            attribute,
            direction,
        })
    }

    /// Next parameter as an operand; directives cannot fill operand slots.
    fn take_operand(&mut self, span: TextRange, spelling: &str) -> Option<usize> {
        let signature = self.signature;
        let index = self.next;
        let param = signature.parameters.get(index)?;
        self.next += 1;
        if param.kind.is_directive() {
            self.diagnostics
                .report(DiagnosticKind::DirectiveAsOperand, span)
                .message(format!(
                    "`{}` ({}) would be the operand of `{spelling}`",
                    param.name, param.kind
                ))
                .emit();
            return None;
        }
        Some(index)
    }

    fn bind_trailing(&mut self, bound: &mut BoundMethod) {
        let signature = self.signature;
        for (index, param) in signature.parameters.iter().enumerate().skip(self.next) {
            if param.kind.is_directive() {
                bound.directives.push(BoundDirective {
                    index,
                    kind: param.kind,
                });
            } else if param.kind.is_entity()
                && bound.prefix == PrefixKind::Save
                && bound.entity.is_none()
            {
                bound.entity = Some(index);
            } else {
                self.diagnostics
                    .report(DiagnosticKind::ExtraParameter, self.end)
                    .message(format!("`{}` at position {index}", param.name))
                    .emit();
            }
        }
        self.next = signature.parameters.len();

        if bound.prefix == PrefixKind::Save && bound.entity.is_none() {
            self.diagnostics
                .report(DiagnosticKind::MissingEntityParameter, bound.prefix_span)
                .emit();
        }
    }

    fn resolve(&self, token: &SyntaxToken) -> BoundAttribute {
        let spelling = token.text().to_string();
        let name = match self.attributes.lookup(&spelling) {
            [name] => Some(name.clone()),
            _ => None,
        };
        BoundAttribute {
            span: token.text_range(),
            spelling,
            name,
        }
    }
}

fn parameters(n: usize) -> String {
    if n == 1 {
        "1 parameter".to_string()
    } else {
        format!("{n} parameters")
    }
}
