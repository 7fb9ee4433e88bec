//! Result shape checks: prefix vs. return type, `First` and directive parameters.

use repoquery_core::EntityModel;
use repoquery_core::grammar::PrefixKind;

use super::Validator;
use crate::diagnostics::DiagnosticKind;
use crate::plan::ResultShape;
use crate::signature::{ParamKind, ReturnShape};

/// Return shapes a prefix may declare.
///
/// `save` answers in kind: one entity back for one entity, a sequence for many.
fn permitted_returns(prefix: PrefixKind, entity: Option<ParamKind>) -> &'static [ReturnShape] {
    use ReturnShape::*;
    match (prefix, entity) {
        (PrefixKind::Find, _) => &[Entity, Optional, Sequence, Stream, Map, Page],
        (PrefixKind::Count, _) => &[Count],
        (PrefixKind::Exists, _) => &[Boolean],
        (PrefixKind::Delete | PrefixKind::Update, _) => &[Void, Boolean, Count],
        (PrefixKind::Save, Some(ParamKind::Entity)) => &[Void, Entity],
        (PrefixKind::Save, Some(ParamKind::Entities)) => &[Void, Sequence, Stream],
        (PrefixKind::Save, _) => &[Void, Entity, Sequence, Stream],
    }
}

fn quoted(shapes: &[ReturnShape]) -> String {
    let names: Vec<_> = shapes.iter().map(|s| format!("`{s}`")).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

impl<M: EntityModel + ?Sized> Validator<'_, M> {
    pub(super) fn check_return_shape(&mut self) {
        let bound = self.bound;
        let returns = self.signature.returns;
        let prefix = bound.prefix;

        let entity = bound.entity.map(|i| self.signature.parameters[i].kind);
        let permitted = permitted_returns(prefix, entity);
        if !permitted.contains(&returns) {
            self.diagnostics
                .report(DiagnosticKind::IncompatibleReturn, bound.prefix_span)
                .message(format!(
                    "`{prefix}` methods return {}, found `{returns}`",
                    quoted(permitted)
                ))
                .emit();
            return;
        }

        let pageable = bound.directives.iter().any(|d| d.kind == ParamKind::Pageable);
        match returns {
            ReturnShape::Page if !pageable => {
                self.diagnostics
                    .report(DiagnosticKind::IncompatibleReturn, bound.prefix_span)
                    .message("`page` results need a `Pageable` parameter")
                    .emit();
            }
            ReturnShape::Map if self.model.id_attribute().is_none() => {
                self.diagnostics
                    .report(DiagnosticKind::MissingIdAttribute, bound.prefix_span)
                    .message(format!(
                        "`{}` declares no id attribute",
                        self.model.entity_name()
                    ))
                    .emit();
            }
            _ if returns.is_single() && pageable => {
                self.diagnostics
                    .report(DiagnosticKind::IncompatibleReturn, bound.end)
                    .message(format!(
                        "a `Pageable` parameter needs a multi-entity return, found `{returns}`"
                    ))
                    .emit();
            }
            _ => {}
        }
    }

    /// Effective `First` count, if the method has a valid one.
    pub(super) fn check_first(&mut self) -> Option<u64> {
        let bound = self.bound;
        let first = bound.first.as_ref()?;

        let count = match &first.number {
            None => self.config.default_first_count,
            Some(text) => match text.parse::<u64>() {
                Ok(0) => {
                    self.diagnostics
                        .report(DiagnosticKind::InvalidFirstCount, first.span)
                        .message("found `First0`")
                        .emit();
                    return None;
                }
                Ok(n) => n,
                Err(_) => {
                    self.diagnostics
                        .report(DiagnosticKind::InvalidFirstCount, first.span)
                        .message(format!("`{text}` is out of range"))
                        .emit();
                    return None;
                }
            },
        };

        let returns = self.signature.returns;
        if count > 1 && returns.is_single() {
            self.diagnostics
                .report(DiagnosticKind::IncompatibleReturn, first.span)
                .message(format!(
                    "`First{count}` returns up to {count} entities, found `{returns}`"
                ))
                .emit();
        }
        Some(count)
    }

    pub(super) fn check_directives(&mut self, first: Option<u64>) {
        let bound = self.bound;
        let signature = self.signature;

        for directive in &bound.directives {
            if bound.prefix != PrefixKind::Find {
                let param = &signature.parameters[directive.index];
                self.diagnostics
                    .report(DiagnosticKind::DirectiveNotAllowed, bound.end)
                    .message(format!(
                        "`{}` ({}) on a `{}` method",
                        param.name, param.kind, bound.prefix
                    ))
                    .emit();
            }
        }

        let limits: Vec<usize> = self.directive_indices(ParamKind::Limit);
        let pageables: Vec<usize> = self.directive_indices(ParamKind::Pageable);

        for (kind, indices) in [("Limit", &limits), ("Pageable", &pageables)] {
            for &index in indices.iter().skip(1) {
                let name = &signature.parameters[index].name;
                self.diagnostics
                    .report(DiagnosticKind::DuplicateDirective, bound.end)
                    .message(format!("`{name}` is a second `{kind}`"))
                    .emit();
            }
        }

        if let Some(first_clause) = bound.first.as_ref().filter(|_| first.is_some()) {
            if let Some(&index) = limits.first() {
                let name = &signature.parameters[index].name;
                self.diagnostics
                    .report(DiagnosticKind::ConflictingLimit, first_clause.span)
                    .message(format!("`First` and the `Limit` parameter `{name}` both set one"))
                    .emit();
            }
            if let Some(&index) = pageables.first() {
                let name = &signature.parameters[index].name;
                self.diagnostics
                    .report(DiagnosticKind::ConflictingLimit, first_clause.span)
                    .message(format!("`First` cannot be combined with the `Pageable` parameter `{name}`"))
                    .emit();
            }
        }

        if let (Some(&limit), Some(&page)) = (limits.first(), pageables.first()) {
            let (limit, page) = (&signature.parameters[limit].name, &signature.parameters[page].name);
            self.diagnostics
                .report(DiagnosticKind::ConflictingLimit, bound.end)
                .message(format!("`{limit}` (Limit) and `{page}` (Pageable) both set one"))
                .emit();
        }
    }

    fn directive_indices(&self, kind: ParamKind) -> Vec<usize> {
        self.bound
            .directives
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.index)
            .collect()
    }

    pub(super) fn result_shape(&self, first: Option<u64>, paged: bool) -> ResultShape {
        match self.bound.prefix {
            PrefixKind::Count => ResultShape::Counted,
            PrefixKind::Exists => ResultShape::Existence,
            PrefixKind::Delete | PrefixKind::Update => ResultShape::MutationCount,
            PrefixKind::Save => ResultShape::Persisted,
            PrefixKind::Find => match (self.signature.returns, first) {
                _ if paged => ResultShape::Paged,
                (ReturnShape::Entity, _) => ResultShape::SingleRequired,
                (ReturnShape::Optional, _) => ResultShape::SingleOptional,
                (_, Some(count)) => ResultShape::BoundedList(count),
                (_, None) => ResultShape::UnboundedList,
            },
        }
    }
}
