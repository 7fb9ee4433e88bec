//! Predicate trees over bound conditions.

use repoquery_core::AttributeName;
use repoquery_core::grammar::{Arity, OperatorKind};
use serde::Serialize;

/// A single attribute comparison with its operand parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Condition {
    pub attribute: AttributeName,
    pub operator: OperatorKind,
    pub negated: bool,
    pub arity: Arity,
    /// Parameter indices, in declaration order.
    pub operands: Vec<usize>,
}

/// Conditions joined by `And`/`Or`.
///
/// Built left-associatively: `A And B Or C` is `Or(And(A, B), C)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateNode {
    Condition(Condition),
    And(Box<PredicateNode>, Box<PredicateNode>),
    Or(Box<PredicateNode>, Box<PredicateNode>),
}

impl PredicateNode {
    pub fn and(lhs: PredicateNode, rhs: PredicateNode) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: PredicateNode, rhs: PredicateNode) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Conditions in pre-order, left to right.
    pub fn conditions(&self) -> Conditions<'_> {
        Conditions { stack: vec![self] }
    }
}

/// Pre-order iterator over the conditions of a predicate.
#[derive(Debug, Clone)]
pub struct Conditions<'a> {
    stack: Vec<&'a PredicateNode>,
}

impl Conditions<'_> {
    pub(crate) fn empty() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<'a> Iterator for Conditions<'a> {
    type Item = &'a Condition;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                PredicateNode::Condition(c) => return Some(c),
                PredicateNode::And(l, r) | PredicateNode::Or(l, r) => {
                    self.stack.push(r);
                    self.stack.push(l);
                }
            }
        }
    }
}
