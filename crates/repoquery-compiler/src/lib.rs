//! repoquery compiler: from repository method signatures to query plans.
//!
//! This crate provides the compilation pipeline for derived queries:
//! - `parser` - keyword lexer, CST, and AST construction
//! - `bind` - positional parameter binding
//! - `validate` - plan validation against the entity model
//! - `plan` - the backend-agnostic `QueryPlan` and runtime directive values
//! - `compile` - the `Compiler` facade and its configuration
//! - `cache` - per-signature plan cache
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bind;
pub mod cache;
pub mod compile;
pub mod diagnostics;
pub mod parser;
pub mod plan;
pub mod signature;
pub mod validate;

#[cfg(test)]
pub mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use cache::{CacheStats, PlanCache};
pub use compile::{CompileError, CompiledMethod, Compiler, CompilerConfig, JunctionPolicy, RepositoryError};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use plan::{LimitSpec, PredicateNode, QueryPlan, ResultShape, SortItem};
pub use signature::{MethodSignature, ParamKind, Parameter, ReturnShape};

/// Errors that can occur while compiling one method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    #[error("method name has {} unrecognized fragments", .0.error_count())]
    UnknownFragment(Diagnostics),

    #[error("method name has {} ambiguous tokens", .0.error_count())]
    AmbiguousToken(Diagnostics),

    #[error("method name is malformed with {} errors", .0.error_count())]
    MalformedMethodName(Diagnostics),

    #[error("parameters do not match the method name with {} errors", .0.error_count())]
    ParameterArityMismatch(Diagnostics),

    #[error("query plan failed validation with {} errors", .0.error_count())]
    PlanValidation(Diagnostics),
}

impl Error {
    /// Diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::ExecFuelExhausted => None,
            Self::UnknownFragment(d)
            | Self::AmbiguousToken(d)
            | Self::MalformedMethodName(d)
            | Self::ParameterArityMismatch(d)
            | Self::PlanValidation(d) => Some(d),
        }
    }
}

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, Error>;
