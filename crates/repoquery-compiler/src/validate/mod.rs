//! Plan validation.
//!
//! Checks a bound method against its declared return shape and the entity
//! model, collecting every violation before giving up:
//! - `shape`: prefix vs. return shape, `First`, `Limit` and `Pageable` interplay
//! - `operators`: attribute existence, operator applicability, operand kinds
//!
//! A method with no errors yields its `QueryPlan`; warnings do not block it.

mod operators;
mod shape;


use std::collections::HashMap;

use repoquery_core::grammar::PrefixKind;
use repoquery_core::{AttributeName, EntityModel};

use crate::PassResult;
use crate::bind::{BoundAttribute, BoundMethod, BoundPredicate, Junction};
use crate::compile::{CompilerConfig, JunctionPolicy};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Severity};
use crate::plan::{
    Assignment, Condition, LimitSpec, PlanParts, PredicateNode, QueryPlan, SortItem, SortTerm,
};
use crate::signature::{MethodSignature, ParamKind};

/// Validate a bound method and build its plan.
///
/// Returns `None` for the plan when any error was reported.
pub fn validate<M: EntityModel + ?Sized>(
    bound: &BoundMethod,
    signature: &MethodSignature,
    model: &M,
    config: &CompilerConfig,
) -> PassResult<Option<QueryPlan>> {
    let mut validator = Validator {
        bound,
        signature,
        model,
        config,
        diagnostics: Diagnostics::new(),
    };
    let plan = validator.run();
    tracing::trace!(
        method = %signature.name,
        errors = validator.diagnostics.error_count(),
        warnings = validator.diagnostics.warning_count(),
        "validated plan"
    );
    Ok((plan, validator.diagnostics))
}

pub(crate) struct Validator<'a, M: ?Sized> {
    bound: &'a BoundMethod,
    signature: &'a MethodSignature,
    model: &'a M,
    config: &'a CompilerConfig,
    diagnostics: Diagnostics,
}

impl<M: EntityModel + ?Sized> Validator<'_, M> {
    fn run(&mut self) -> Option<QueryPlan> {
        self.check_return_shape();
        let first = self.check_first();
        self.check_directives(first);

        let bound = self.bound;
        if let Some(predicate) = &bound.predicate {
            for condition in predicate.conditions() {
                self.check_condition(condition);
            }
            self.check_junctions(predicate);
        }
        for assignment in &bound.assignments {
            self.check_assignment(assignment);
        }
        self.check_sort_terms();

        if self.diagnostics.has_errors() {
            return None;
        }
        self.build(first)
    }

    /// Resolved attribute that the model knows; reports otherwise.
    fn attribute(&mut self, attribute: &BoundAttribute) -> Option<AttributeName> {
        match &attribute.name {
            Some(name) if self.model.has_attribute(name) => Some(name.clone()),
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::UnknownAttribute, attribute.span)
                    .message(attribute.spelling.as_str())
                    .emit();
                None
            }
        }
    }

    fn check_sort_terms(&mut self) {
        let bound = self.bound;
        let mut seen: HashMap<AttributeName, usize> = HashMap::new();
        for (i, term) in bound.order_by.iter().enumerate() {
            let Some(name) = self.attribute(&term.attribute) else {
                continue;
            };
            if let Some(&earlier) = seen.get(&name) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicateSortAttribute, term.attribute.span)
                    .message(name.as_str())
                    .related_to("first sorted here", bound.order_by[earlier].attribute.span)
                    .emit();
            } else {
                seen.insert(name, i);
            }
        }
        if !bound.order_by.is_empty() && bound.prefix != PrefixKind::Find {
            let span = bound.order_by[0].span;
            self.diagnostics
                .report(DiagnosticKind::DirectiveNotAllowed, span)
                .message(format!("`OrderBy` on a `{}` method", bound.prefix))
                .emit();
        }
    }

    fn check_junctions(&mut self, predicate: &BoundPredicate) {
        let severity = match self.config.junctions {
            JunctionPolicy::LeftToRight => return,
            JunctionPolicy::Warn => Severity::Warning,
            JunctionPolicy::Reject => Severity::Error,
        };
        let junctions = predicate.junctions();
        let Some(&(leading, _)) = junctions.first() else {
            return;
        };
        let Some(&(kind, span)) = junctions.iter().find(|(kind, _)| *kind != leading) else {
            return;
        };
        let (this, other) = match kind {
            Junction::And => ("And", "Or"),
            Junction::Or => ("Or", "And"),
        };
        let detail = format!("`{this}` applies to everything before it, including the `{other}`");
        if severity == Severity::Warning {
            tracing::warn!(method = %self.signature.name, "{detail}");
        }
        self.diagnostics
            .report(DiagnosticKind::MixedJunctions, span)
            .message(detail)
            .severity(severity)
            .emit();
    }

    fn build(&self, first: Option<u64>) -> Option<QueryPlan> {
        let bound = self.bound;
        let predicate = match &bound.predicate {
            Some(predicate) => Some(lower_predicate(predicate)?),
            None => None,
        };

        let assignments = bound
            .assignments
            .iter()
            .map(|a| {
                Some(Assignment {
                    op: a.op,
                    attribute: a.attribute.name.clone()?,
                    param: a.param,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let mut sort = bound
            .order_by
            .iter()
            .map(|t| {
                Some(SortItem::Static(SortTerm {
                    attribute: t.attribute.name.clone()?,
                    direction: t.direction,
                }))
            })
            .collect::<Option<Vec<_>>>()?;

        let mut limit = first.map(|count| LimitSpec::Fixed { count, offset: 0 });
        let mut pagination = None;
        for directive in &bound.directives {
            match directive.kind {
                ParamKind::Sort => sort.push(SortItem::Parameter(directive.index)),
                ParamKind::SortVarargs => sort.push(SortItem::Parameters(directive.index)),
                ParamKind::Pageable => {
                    sort.push(SortItem::Pageable(directive.index));
                    pagination.get_or_insert(directive.index);
                }
                ParamKind::Limit => {
                    limit.get_or_insert(LimitSpec::Parameter(directive.index));
                }
                _ => {}
            }
        }

        let result = self.result_shape(first, pagination.is_some());
        Some(QueryPlan::from_parts(PlanParts {
            prefix: bound.prefix,
            predicate,
            assignments,
            sort,
            limit,
            pagination,
            entity: bound.entity,
            result,
            returns: self.signature.returns,
        }))
    }
}

/// Strip spans and resolve names; `None` if any attribute is unresolved.
fn lower_predicate(predicate: &BoundPredicate) -> Option<PredicateNode> {
    Some(match predicate {
        BoundPredicate::Condition(c) => PredicateNode::Condition(Condition {
            attribute: c.attribute.name.clone()?,
            operator: c.operator.kind.clone(),
            negated: c.negated,
            arity: c.operator.arity,
            operands: c.operands.clone(),
        }),
        BoundPredicate::Junction { kind, lhs, rhs, .. } => {
            let (lhs, rhs) = (lower_predicate(lhs)?, lower_predicate(rhs)?);
            match kind {
                Junction::And => PredicateNode::and(lhs, rhs),
                Junction::Or => PredicateNode::or(lhs, rhs),
            }
        }
    })
}
