//! Test fixtures and snapshot macros.

use repoquery_core::grammar::Grammar;
use repoquery_core::{AttributeIndex, DynamicEntityModel, EntityModel, TypeCategory};

use crate::compile::{CompileError, Compiler};
use crate::parser::{self, lexer};
use crate::plan::QueryPlan;
use crate::signature::{MethodSignature, ReturnShape};
use crate::Diagnostics;

/// Entity behind the `Catalog` repository.
pub fn product() -> DynamicEntityModel {
    DynamicEntityModel::new("Product")
        .id("id", TypeCategory::Numeric)
        .and_then(|m| m.attribute("name", TypeCategory::String))
        .and_then(|m| m.attribute("price", TypeCategory::Numeric))
        .and_then(|m| m.attribute("surgePrice", TypeCategory::Numeric))
        .and_then(|m| m.attribute("description", TypeCategory::String))
        .and_then(|m| m.attribute("modifiedOn", TypeCategory::Temporal))
        .and_then(|m| m.attribute("discontinued", TypeCategory::Boolean))
        .and_then(|m| m.attribute("tags", TypeCategory::Collection))
        .and_then(|m| m.attribute("vendor", TypeCategory::Other))
        .expect("valid product model")
}

/// Entity behind the `Employees` repository.
pub fn employee() -> DynamicEntityModel {
    DynamicEntityModel::new("Employee")
        .id("badge", TypeCategory::Numeric)
        .and_then(|m| m.attribute("lastName", TypeCategory::String))
        .and_then(|m| m.attribute("age", TypeCategory::Numeric))
        .and_then(|m| m.attribute("yearHired", TypeCategory::Numeric))
        .and_then(|m| m.attribute("salary", TypeCategory::Numeric))
        .and_then(|m| m.attribute("startDate", TypeCategory::Temporal))
        .and_then(|m| m.attribute("active", TypeCategory::Boolean))
        .and_then(|m| m.attribute("skills", TypeCategory::Collection))
        .expect("valid employee model")
}

/// Fixture model for an interface name used in tests.
pub fn model_for(interface: &str) -> DynamicEntityModel {
    match interface {
        "Employees" => employee(),
        _ => product(),
    }
}

pub fn catalog(name: &str, returns: ReturnShape) -> MethodSignature {
    MethodSignature::new("Catalog", name, returns)
}

pub fn employees(name: &str, returns: ReturnShape) -> MethodSignature {
    MethodSignature::new("Employees", name, returns)
}

pub fn compile(signature: &MethodSignature) -> Result<QueryPlan, CompileError> {
    let grammar = Grammar::standard();
    let model = model_for(&signature.interface);
    Compiler::new(&grammar, &model).compile(signature)
}

/// CST dump of a method name against the product model, followed by any
/// lexer and parser diagnostics.
pub fn cst(name: &str) -> String {
    let grammar = Grammar::standard();
    let model = product();
    let (dump, diagnostics) = parse_with(name, &grammar, &model);
    if diagnostics.is_empty() {
        dump
    } else {
        format!("{dump}---\n{diagnostics}")
    }
}

pub fn parse_with<M: EntityModel>(
    name: &str,
    grammar: &Grammar,
    model: &M,
) -> (String, Diagnostics) {
    let attributes = AttributeIndex::new(model);
    let lexed = lexer::lex(name, grammar, &attributes);
    let mut diagnostics = lexed.diagnostics;
    let (root, parse_diagnostics) =
        parser::parse(name, lexed.tokens, grammar, None).expect("no fuel limit");
    diagnostics.extend(parse_diagnostics);
    (parser::dump(root.as_cst()), diagnostics)
}

pub fn expect_plan(signature: &MethodSignature) -> String {
    match compile(signature) {
        Ok(plan) => plan.to_string(),
        Err(err) => panic!("expected a plan, got:\n{}", err.render(false)),
    }
}

pub fn expect_error(signature: &MethodSignature) -> String {
    match compile(signature) {
        Ok(plan) => panic!("expected an error, got:\n{plan}"),
        Err(err) => err.render(false),
    }
}

/// Snapshot test for CST output.
#[macro_export]
macro_rules! shot_cst {
    ($name:literal, @$snapshot:literal) => {{
        let name = $name;
        let output = $crate::test_utils::cst(name);
        insta::assert_snapshot!(format!("{name}\n---\n{output}"), @$snapshot);
    }};
}

/// Snapshot test for a compiled plan.
#[macro_export]
macro_rules! shot_plan {
    ($signature:expr, @$snapshot:literal) => {{
        let signature = $signature;
        let output = $crate::test_utils::expect_plan(&signature);
        insta::assert_snapshot!(format!("{}\n---\n{output}", signature.name), @$snapshot);
    }};
}

/// Snapshot test for rendered compile errors.
#[macro_export]
macro_rules! shot_error {
    ($signature:expr, @$snapshot:literal) => {{
        let signature = $signature;
        let output = $crate::test_utils::expect_error(&signature);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}
