use repoquery_core::AttributeIndex;
use repoquery_core::grammar::Grammar;

use super::ast::{Expr, Root};
use super::lexer::lex;
use super::parse;
use crate::test_utils::product;

fn root(name: &str) -> Root {
    let grammar = Grammar::standard();
    let model = product();
    let attributes = AttributeIndex::new(&model);
    let lexed = lex(name, &grammar, &attributes);
    assert!(lexed.diagnostics.is_empty(), "{}", lexed.diagnostics);
    let (root, diagnostics) = parse(name, lexed.tokens, &grammar, None).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics}");
    root
}

fn texts(tokens: impl IntoIterator<Item = Option<super::SyntaxToken>>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.map_or_else(|| "-".to_string(), |t| t.text().to_string()))
        .collect()
}

#[test]
fn subject_parts() {
    let root = root("findFirst25ByName");
    let subject = root.subject().unwrap();
    assert_eq!(subject.prefix().unwrap().text(), "find");
    let first = subject.first().unwrap();
    assert_eq!(first.keyword().unwrap().text(), "First");
    assert_eq!(first.count().unwrap().text(), "25");
    assert!(root.by().is_some());
}

#[test]
fn bare_first_has_no_count() {
    let root = root("findFirstByName");
    let first = root.subject().unwrap().first().unwrap();
    assert!(first.count().is_none());
}

#[test]
fn condition_tokens() {
    let root = root("findByPriceNotBetween");
    let conditions = root.predicate().unwrap().expr().unwrap().conditions();
    assert_eq!(conditions.len(), 1);
    let condition = &conditions[0];
    assert_eq!(condition.attribute().unwrap().text(), "Price");
    assert!(condition.not_token().is_some());
    assert_eq!(condition.operator().unwrap().text(), "Between");
}

#[test]
fn implicit_operator_is_absent() {
    let root = root("findByName");
    let conditions = root.predicate().unwrap().expr().unwrap().conditions();
    assert!(conditions[0].operator().is_none());
    assert!(conditions[0].not_token().is_none());
}

#[test]
fn junctions_nest_to_the_left() {
    let root = root("findByNameOrPriceAndDiscontinuedTrue");
    let Some(Expr::And(and)) = root.predicate().unwrap().expr() else {
        panic!("expected a top-level `And`");
    };
    assert_eq!(and.keyword().unwrap().text(), "And");

    let Some(Expr::Or(or)) = and.lhs() else {
        panic!("expected `Or` on the left");
    };
    assert_eq!(or.keyword().unwrap().text(), "Or");
    assert!(matches!(or.lhs(), Some(Expr::Condition(_))));
    assert!(matches!(or.rhs(), Some(Expr::Condition(_))));

    let Some(Expr::Condition(last)) = and.rhs() else {
        panic!("expected a condition on the right");
    };
    assert_eq!(last.attribute().unwrap().text(), "Discontinued");
}

#[test]
fn conditions_in_source_order() {
    let root = root("findByNameOrPriceAndDiscontinuedTrueAndTagsContains");
    let conditions = root.predicate().unwrap().expr().unwrap().conditions();
    let attributes = texts(conditions.iter().map(|c| c.attribute()));
    assert_eq!(attributes, ["Name", "Price", "Discontinued", "Tags"]);
}

#[test]
fn assignments() {
    let root = root("updateByIdSetNameAddPrice");
    let updates = root.updates().unwrap();
    let ops = texts(updates.assignments().map(|a| a.op()));
    let attributes = texts(updates.assignments().map(|a| a.attribute()));
    assert_eq!(ops, ["Set", "Add"]);
    assert_eq!(attributes, ["Name", "Price"]);
}

#[test]
fn sort_terms() {
    let root = root("findByOrderByPriceDescNameModifiedOnAsc");
    assert!(root.predicate().is_none());
    let order_by = root.order_by().unwrap();
    let attributes = texts(order_by.terms().map(|t| t.attribute()));
    let directions = texts(order_by.terms().map(|t| t.direction()));
    assert_eq!(attributes, ["Price", "Name", "ModifiedOn"]);
    assert_eq!(directions, ["Desc", "-", "Asc"]);
}

#[test]
fn expr_cast_rejects_other_nodes() {
    let root = root("findByName");
    assert!(Expr::cast(root.as_cst().clone()).is_none());
}
