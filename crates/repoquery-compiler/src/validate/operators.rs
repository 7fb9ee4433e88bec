//! Condition and assignment checks against attribute type categories.

use repoquery_core::grammar::{Arity, AssignOp};
use repoquery_core::{EntityModel, TypeCategory};

use super::Validator;
use crate::bind::{BoundAssignment, BoundCondition};
use crate::diagnostics::DiagnosticKind;
use crate::signature::ParamKind;

/// Whether a value of category `param` can be compared with an attribute of category `attribute`.
fn categories_agree(param: TypeCategory, attribute: TypeCategory) -> bool {
    param == attribute
        || param == TypeCategory::Other
        || attribute == TypeCategory::Other
        // Element of a collection attribute: the model does not say what it holds.
        || attribute == TypeCategory::Collection
}

impl<M: EntityModel + ?Sized> Validator<'_, M> {
    pub(super) fn check_condition(&mut self, condition: &BoundCondition) {
        let spec = &condition.operator;
        let expected = spec.arity.operand_params();
        if condition.operands.len() != expected {
            self.diagnostics
                .report(DiagnosticKind::ArityMismatch, condition.span)
                .message(format!(
                    "`{}` takes {expected}, bound {}",
                    spec.kind,
                    condition.operands.len()
                ))
                .emit();
        }

        let Some(attribute) = self.attribute(&condition.attribute) else {
            return;
        };
        let Some(category) = self.model.type_category_of(&attribute) else {
            return;
        };

        if !spec.applies_to.permits(category) {
            let span = condition.operator_span.unwrap_or(condition.span);
            self.diagnostics
                .report(DiagnosticKind::OperatorNotApplicable, span)
                .message(format!(
                    "`{}` needs {}, `{attribute}` is {category}",
                    spec.kind,
                    spec.applies_to.describe()
                ))
                .emit();
        }

        let signature = self.signature;
        for &index in &condition.operands {
            let param = &signature.parameters[index];
            let element = match (spec.arity, param.kind) {
                (Arity::Many, ParamKind::Collection(element)) => element,
                (Arity::Many, kind) => {
                    self.diagnostics
                        .report(DiagnosticKind::OperandKindMismatch, condition.span)
                        .message(format!(
                            "`{}` takes a collection, `{}` is {kind}",
                            spec.kind, param.name
                        ))
                        .emit();
                    continue;
                }
                (_, ParamKind::Value(value)) => value,
                (_, kind) => {
                    self.diagnostics
                        .report(DiagnosticKind::OperandKindMismatch, condition.span)
                        .message(format!(
                            "`{}` takes a single value, `{}` is {kind}",
                            spec.kind, param.name
                        ))
                        .emit();
                    continue;
                }
            };
            if !categories_agree(element, category) {
                self.diagnostics
                    .report(DiagnosticKind::OperandCategoryMismatch, condition.attribute.span)
                    .message(format!(
                        "`{attribute}` is {category}, `{}` is {element}",
                        param.name
                    ))
                    .emit();
            }
        }
    }

    pub(super) fn check_assignment(&mut self, assignment: &BoundAssignment) {
        let Some(attribute) = self.attribute(&assignment.attribute) else {
            return;
        };
        let Some(category) = self.model.type_category_of(&attribute) else {
            return;
        };

        if assignment.op == AssignOp::Add
            && !matches!(category, TypeCategory::Numeric | TypeCategory::Collection)
        {
            self.diagnostics
                .report(DiagnosticKind::OperatorNotApplicable, assignment.span)
                .message(format!(
                    "`Add` needs numeric or collection attributes, `{attribute}` is {category}"
                ))
                .emit();
        }

        let param = &self.signature.parameters[assignment.param];
        match param.kind {
            ParamKind::Value(value) if !categories_agree(value, category) => {
                self.diagnostics
                    .report(DiagnosticKind::OperandCategoryMismatch, assignment.attribute.span)
                    .message(format!(
                        "`{attribute}` is {category}, `{}` is {value}",
                        param.name
                    ))
                    .emit();
            }
            ParamKind::Value(_) => {}
            kind => {
                self.diagnostics
                    .report(DiagnosticKind::OperandKindMismatch, assignment.span)
                    .message(format!(
                        "`{}` takes a single value, `{}` is {kind}",
                        assignment.op, param.name
                    ))
                    .emit();
            }
        }
    }
}
