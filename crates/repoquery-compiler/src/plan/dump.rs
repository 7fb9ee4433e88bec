//! Human-readable plan dump.
//!
//! ```text
//! prefix: find
//! predicate: (and (yearHired Equal ?0) (lastName Like ?1))
//! sort: salary desc, ?2:sort
//! limit: 25
//! result: bounded-list(25)
//! returns: sequence
//! ```
//!
//! Lines for absent parts are omitted.

use std::fmt::{self, Display, Formatter};

use super::{Condition, LimitSpec, PredicateNode, QueryPlan, SortItem};

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("(not ")?;
        }
        write!(f, "({} {}", self.attribute, self.operator)?;
        for operand in &self.operands {
            write!(f, " ?{operand}")?;
        }
        f.write_str(")")?;
        if self.negated {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Display for PredicateNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition(c) => write!(f, "{c}"),
            Self::And(l, r) => write!(f, "(and {l} {r})"),
            Self::Or(l, r) => write!(f, "(or {l} {r})"),
        }
    }
}

impl Display for SortItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(term) => write!(f, "{} {}", term.attribute, term.direction),
            Self::Parameter(i) => write!(f, "?{i}:sort"),
            Self::Parameters(i) => write!(f, "?{i}:sort..."),
            Self::Pageable(i) => write!(f, "?{i}:page"),
        }
    }
}

impl Display for LimitSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { count, offset: 0 } => write!(f, "{count}"),
            Self::Fixed { count, offset } => write!(f, "{count} offset {offset}"),
            Self::Parameter(i) => write!(f, "?{i}"),
        }
    }
}

impl Display for QueryPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "prefix: {}", self.prefix)?;
        if let Some(predicate) = &self.predicate {
            writeln!(f, "predicate: {predicate}")?;
        }
        if !self.assignments.is_empty() {
            let items: Vec<_> = self
                .assignments
                .iter()
                .map(|a| format!("{} {} ?{}", a.op.as_str().to_lowercase(), a.attribute, a.param))
                .collect();
            writeln!(f, "updates: {}", items.join(", "))?;
        }
        if let Some(entity) = self.entity {
            writeln!(f, "entity: ?{entity}")?;
        }
        if !self.sort.is_empty() {
            let items: Vec<_> = self.sort.iter().map(ToString::to_string).collect();
            writeln!(f, "sort: {}", items.join(", "))?;
        }
        if let Some(limit) = &self.limit {
            writeln!(f, "limit: {limit}")?;
        }
        if let Some(page) = self.pagination {
            writeln!(f, "page: ?{page}")?;
        }
        writeln!(f, "result: {}", self.result)?;
        write!(f, "returns: {}", self.returns)
    }
}
