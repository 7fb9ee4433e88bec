//! Backend-agnostic query plans.
//!
//! A `QueryPlan` is the validated output of compiling one method signature.
//! It is immutable: fields are private and only the validator constructs it.
//! Parameter references are positional indices into the method's parameter list.

pub mod directive;

mod dump;
mod predicate;

#[cfg(test)]
mod plan_tests;

use std::collections::BTreeSet;
use std::fmt;

use repoquery_core::AttributeName;
use repoquery_core::grammar::{AssignOp, PrefixKind};
use serde::Serialize;

use crate::signature::ReturnShape;

pub use directive::{DirectiveError, DirectiveValue, Window};
pub use predicate::{Condition, Conditions, PredicateNode};

/// Sort direction; `Asc` when a method name omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort criterion written in the method name (`OrderBySalaryDesc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SortTerm {
    pub attribute: AttributeName,
    pub direction: Direction,
}

/// One source of ordering, in application order.
///
/// Static terms come first, then runtime sources in parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortItem {
    Static(SortTerm),
    /// A `Sort` parameter.
    Parameter(usize),
    /// A variadic `Sort...` parameter.
    Parameters(usize),
    /// Sort criteria carried by a `Pageable` parameter.
    Pageable(usize),
}

impl SortItem {
    /// Parameter supplying this item at runtime.
    pub fn parameter(&self) -> Option<usize> {
        match self {
            Self::Static(_) => None,
            Self::Parameter(i) | Self::Parameters(i) | Self::Pageable(i) => Some(*i),
        }
    }
}

/// Cap on the number of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitSpec {
    /// From `First<N>`.
    Fixed { count: u64, offset: u64 },
    /// From a `Limit` parameter.
    Parameter(usize),
}

/// Update clause bound to its value parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    pub op: AssignOp,
    pub attribute: AttributeName,
    pub param: usize,
}

/// How the backend should shape the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultShape {
    SingleOptional,
    SingleRequired,
    BoundedList(u64),
    UnboundedList,
    Paged,
    Counted,
    Existence,
    MutationCount,
    Persisted,
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleOptional => f.write_str("single-optional"),
            Self::SingleRequired => f.write_str("single-required"),
            Self::BoundedList(n) => write!(f, "bounded-list({n})"),
            Self::UnboundedList => f.write_str("unbounded-list"),
            Self::Paged => f.write_str("paged"),
            Self::Counted => f.write_str("counted"),
            Self::Existence => f.write_str("existence"),
            Self::MutationCount => f.write_str("mutation-count"),
            Self::Persisted => f.write_str("persisted"),
        }
    }
}

/// Validated, structured form of one repository method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    prefix: PrefixKind,
    predicate: Option<PredicateNode>,
    assignments: Vec<Assignment>,
    sort: Vec<SortItem>,
    limit: Option<LimitSpec>,
    pagination: Option<usize>,
    entity: Option<usize>,
    result: ResultShape,
    returns: ReturnShape,
}

/// Everything a plan holds; the validator fills it in.
#[derive(Debug, Clone)]
pub(crate) struct PlanParts {
    pub prefix: PrefixKind,
    pub predicate: Option<PredicateNode>,
    pub assignments: Vec<Assignment>,
    pub sort: Vec<SortItem>,
    pub limit: Option<LimitSpec>,
    pub pagination: Option<usize>,
    pub entity: Option<usize>,
    pub result: ResultShape,
    pub returns: ReturnShape,
}

impl QueryPlan {
    pub(crate) fn from_parts(parts: PlanParts) -> Self {
        Self {
            prefix: parts.prefix,
            predicate: parts.predicate,
            assignments: parts.assignments,
            sort: parts.sort,
            limit: parts.limit,
            pagination: parts.pagination,
            entity: parts.entity,
            result: parts.result,
            returns: parts.returns,
        }
    }

    pub fn prefix(&self) -> PrefixKind {
        self.prefix
    }

    pub fn predicate(&self) -> Option<&PredicateNode> {
        self.predicate.as_ref()
    }

    /// Conditions in pre-order, left to right.
    pub fn conditions(&self) -> Conditions<'_> {
        match &self.predicate {
            Some(node) => node.conditions(),
            None => Conditions::empty(),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn sort(&self) -> &[SortItem] {
        &self.sort
    }

    pub fn limit(&self) -> Option<LimitSpec> {
        self.limit
    }

    /// Index of the `Pageable` parameter.
    pub fn pagination(&self) -> Option<usize> {
        self.pagination
    }

    /// Index of the entity parameter of a `save` method.
    pub fn entity(&self) -> Option<usize> {
        self.entity
    }

    pub fn result(&self) -> ResultShape {
        self.result
    }

    pub fn returns(&self) -> ReturnShape {
        self.returns
    }

    /// Parameters carrying data: condition operands, assigned values and the saved entity.
    pub fn operand_count(&self) -> usize {
        let conditions: usize = self.conditions().map(|c| c.operands.len()).sum();
        conditions + self.assignments.len() + usize::from(self.entity.is_some())
    }

    /// Parameters shaping the result: limit, sort and pagination sources.
    pub fn directive_count(&self) -> usize {
        let mut params: BTreeSet<usize> = self.sort.iter().filter_map(SortItem::parameter).collect();
        if let Some(LimitSpec::Parameter(i)) = self.limit {
            params.insert(i);
        }
        params.extend(self.pagination);
        params.len()
    }
}
