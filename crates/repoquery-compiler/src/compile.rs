//! Compiler facade: runs lex → parse → bind → validate for one method.
//!
//! ```
//! use repoquery_compiler::{Compiler, MethodSignature, ParamKind, ReturnShape};
//! use repoquery_core::grammar::Grammar;
//! use repoquery_core::{DynamicEntityModel, TypeCategory};
//!
//! let grammar = Grammar::standard();
//! let model = DynamicEntityModel::new("Product")
//!     .attribute("price", TypeCategory::Numeric)
//!     .unwrap();
//! let compiler = Compiler::new(&grammar, &model);
//!
//! let signature = MethodSignature::new("Catalog", "countByPriceGreaterThanEqual", ReturnShape::Count)
//!     .param("price", ParamKind::Value(TypeCategory::Numeric));
//! let plan = compiler.compile(&signature).unwrap();
//! assert_eq!(plan.result().to_string(), "counted");
//! ```

use repoquery_core::grammar::Grammar;
use repoquery_core::{AttributeIndex, EntityModel};

use crate::bind::bind;
use crate::diagnostics::Diagnostics;
use crate::parser::{self, lexer};
use crate::plan::QueryPlan;
use crate::signature::MethodSignature;
use crate::validate::validate;
use crate::Error;

const DEFAULT_PARSE_FUEL: u32 = 10_000;

/// How a predicate mixing `And` and `Or` is treated.
///
/// Mixed junctions always associate left to right: `A And B Or C` is
/// `(A And B) Or C`. The policy only decides whether to say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JunctionPolicy {
    #[default]
    LeftToRight,
    /// Compile, but attach a warning.
    Warn,
    /// Fail validation.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Upper bound on parser steps per method; `None` disables the limit.
    pub parse_fuel: Option<u32>,
    pub junctions: JunctionPolicy,
    /// Result count of a bare `First`.
    pub default_first_count: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parse_fuel: Some(DEFAULT_PARSE_FUEL),
            junctions: JunctionPolicy::default(),
            default_first_count: 1,
        }
    }
}

/// Compilation failure attributed to one method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{interface}::{method}`: {error}")]
pub struct CompileError {
    pub interface: String,
    pub method: String,
    pub error: Error,
}

impl CompileError {
    fn new(signature: &MethodSignature, error: Error) -> Self {
        Self {
            interface: signature.interface.clone(),
            method: signature.name.clone(),
            error,
        }
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        self.error.diagnostics()
    }

    /// Render against the method name, with `Interface::method` as the path.
    pub fn render(&self, colored: bool) -> String {
        let Some(diagnostics) = self.diagnostics() else {
            return self.to_string();
        };
        let path = format!("{}::{}", self.interface, self.method);
        diagnostics
            .printer()
            .source(&self.method)
            .path(&path)
            .colored(colored)
            .render()
    }
}

/// Every failing method of one repository interface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{interface}` has {} methods that failed to compile", .failures.len())]
pub struct RepositoryError {
    pub interface: String,
    pub failures: Vec<CompileError>,
}

impl RepositoryError {
    pub fn render(&self, colored: bool) -> String {
        let reports: Vec<_> = self.failures.iter().map(|f| f.render(colored)).collect();
        reports.join("\n")
    }
}

/// Successful compilation of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMethod {
    pub signature: MethodSignature,
    pub plan: QueryPlan,
    /// Non-fatal diagnostics, e.g. mixed junctions under [`JunctionPolicy::Warn`].
    pub warnings: Diagnostics,
}

/// Compiles method signatures against one entity model and grammar table.
///
/// Holds only shared references and a read-only attribute index, so one
/// compiler can serve many threads.
pub struct Compiler<'a, M: ?Sized> {
    grammar: &'a Grammar,
    model: &'a M,
    attributes: AttributeIndex,
    config: CompilerConfig,
}

impl<'a, M: EntityModel + ?Sized> Compiler<'a, M> {
    pub fn new(grammar: &'a Grammar, model: &'a M) -> Self {
        Self {
            grammar,
            model,
            attributes: AttributeIndex::new(model),
            config: CompilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_parse_fuel(mut self, fuel: Option<u32>) -> Self {
        self.config.parse_fuel = fuel;
        self
    }

    pub fn with_junction_policy(mut self, policy: JunctionPolicy) -> Self {
        self.config.junctions = policy;
        self
    }

    pub fn with_default_first_count(mut self, count: u64) -> Self {
        self.config.default_first_count = count;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn grammar(&self) -> &Grammar {
        self.grammar
    }

    pub fn model(&self) -> &M {
        self.model
    }

    /// Compile one method into a validated plan.
    pub fn compile(&self, signature: &MethodSignature) -> Result<QueryPlan, CompileError> {
        self.compile_with_warnings(signature).map(|(plan, _)| plan)
    }

    /// Like [`Compiler::compile`], also returning non-fatal diagnostics.
    pub fn compile_with_warnings(
        &self,
        signature: &MethodSignature,
    ) -> Result<(QueryPlan, Diagnostics), CompileError> {
        tracing::debug!(
            interface = %signature.interface,
            method = %signature.name,
            params = signature.parameters.len(),
            "compiling method"
        );
        match self.run(signature) {
            Ok((plan, warnings)) => {
                tracing::debug!(
                    method = %signature.name,
                    result = %plan.result(),
                    warnings = warnings.warning_count(),
                    "compiled method"
                );
                Ok((plan, warnings))
            }
            Err(error) => {
                tracing::debug!(method = %signature.name, %error, "method failed to compile");
                Err(CompileError::new(signature, error))
            }
        }
    }

    /// Compile every method of a repository interface.
    ///
    /// Fails with all failing methods at once; there is no partial result.
    pub fn compile_repository<'s>(
        &self,
        interface: &str,
        methods: impl IntoIterator<Item = &'s MethodSignature>,
    ) -> Result<Vec<CompiledMethod>, RepositoryError> {
        let mut compiled = Vec::new();
        let mut failures = Vec::new();
        for signature in methods {
            match self.compile_with_warnings(signature) {
                Ok((plan, warnings)) => compiled.push(CompiledMethod {
                    signature: signature.clone(),
                    plan,
                    warnings,
                }),
                Err(err) => failures.push(err),
            }
        }

        if !failures.is_empty() {
            tracing::debug!(interface, failed = failures.len(), "repository failed to compile");
            return Err(RepositoryError {
                interface: interface.to_string(),
                failures,
            });
        }
        Ok(compiled)
    }

    fn run(&self, signature: &MethodSignature) -> crate::Result<(QueryPlan, Diagnostics)> {
        let source = signature.name.as_str();

        let lexed = lexer::lex(source, self.grammar, &self.attributes);
        tracing::trace!(tokens = lexed.tokens.len(), "lexed method name");
        let mut diagnostics = lexed.diagnostics;

        let (root, parse_diagnostics) =
            parser::parse(source, lexed.tokens, self.grammar, self.config.parse_fuel)?;
        diagnostics.extend(parse_diagnostics);
        if diagnostics.has_errors() {
            return Err(syntax_error(diagnostics.filtered()));
        }

        let (bound, diagnostics) = bind(&root, signature, self.grammar, &self.attributes)?;
        if diagnostics.has_errors() {
            return Err(Error::ParameterArityMismatch(diagnostics));
        }

        let (plan, diagnostics) = validate(&bound, signature, self.model, &self.config)?;
        match plan {
            Some(plan) => Ok((plan, diagnostics)),
            None => Err(Error::PlanValidation(diagnostics)),
        }
    }
}

/// Classify lexer and parser diagnostics by their highest-priority lexical kind.
fn syntax_error(diagnostics: Diagnostics) -> Error {
    use crate::diagnostics::DiagnosticKind;

    let lexical = diagnostics
        .iter()
        .map(|d| d.kind())
        .filter(DiagnosticKind::is_lexical)
        .min();
    match lexical {
        Some(DiagnosticKind::UnknownFragment) => Error::UnknownFragment(diagnostics),
        Some(_) => Error::AmbiguousToken(diagnostics),
        None => Error::MalformedMethodName(diagnostics),
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod compile_tests;
