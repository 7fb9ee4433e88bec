use repoquery_core::AttributeIndex;
use repoquery_core::grammar::Grammar;

use super::lexer::lex;
use super::parse;
use crate::Error;
use crate::shot_cst;
use crate::test_utils::product;

#[test]
fn single_condition() {
    shot_cst!("countByPriceGreaterThanEqual", @r#"
    countByPriceGreaterThanEqual
    ---
    Root
      Subject
        Prefix "count"
      KwBy "By"
      Predicate
        Condition
          Attribute "Price"
          Operator "GreaterThanEqual"
    "#);
}

#[test]
fn implicit_equality() {
    shot_cst!("existsByName", @r#"
    existsByName
    ---
    Root
      Subject
        Prefix "exists"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
    "#);
}

#[test]
fn and_junction() {
    shot_cst!("findByNameLikeAndPriceLessThanEqual", @r#"
    findByNameLikeAndPriceLessThanEqual
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        AndExpr
          Condition
            Attribute "Name"
            Operator "Like"
          KwAnd "And"
          Condition
            Attribute "Price"
            Operator "LessThanEqual"
    "#);
}

#[test]
fn mixed_junctions_associate_left() {
    shot_cst!("findByNameOrPriceAndDiscontinuedTrue", @r#"
    findByNameOrPriceAndDiscontinuedTrue
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        AndExpr
          OrExpr
            Condition
              Attribute "Name"
            KwOr "Or"
            Condition
              Attribute "Price"
          KwAnd "And"
          Condition
            Attribute "Discontinued"
            Operator "True"
    "#);
}

#[test]
fn first_and_order_by() {
    shot_cst!("findFirst3ByDiscontinuedFalseOrderByPriceDescNameAsc", @r#"
    findFirst3ByDiscontinuedFalseOrderByPriceDescNameAsc
    ---
    Root
      Subject
        Prefix "find"
        FirstClause
          KwFirst "First"
          Number "3"
      KwBy "By"
      Predicate
        Condition
          Attribute "Discontinued"
          Operator "False"
      OrderBy
        KwOrderBy "OrderBy"
        SortTerm
          Attribute "Price"
          KwDesc "Desc"
        SortTerm
          Attribute "Name"
          KwAsc "Asc"
    "#);
}

#[test]
fn negated_condition() {
    shot_cst!("findByPriceNotBetween", @r#"
    findByPriceNotBetween
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Price"
          KwNot "Not"
          Operator "Between"
    "#);
}

#[test]
fn order_by_without_conditions() {
    shot_cst!("findByOrderByName", @r#"
    findByOrderByName
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      OrderBy
        KwOrderBy "OrderBy"
        SortTerm
          Attribute "Name"
    "#);
}

#[test]
fn bare_find() {
    shot_cst!("find", @r#"
    find
    ---
    Root
      Subject
        Prefix "find"
    "#);
}

#[test]
fn update_with_assignments() {
    shot_cst!("updateByIdSetNameAddPrice", @r#"
    updateByIdSetNameAddPrice
    ---
    Root
      Subject
        Prefix "update"
      KwBy "By"
      Predicate
        Condition
          Attribute "Id"
      Updates
        Assignment
          Assign "Set"
          Attribute "Name"
        Assignment
          Assign "Add"
          Attribute "Price"
    "#);
}

#[test]
fn save() {
    shot_cst!("save", @r#"
    save
    ---
    Root
      Subject
        Prefix "save"
    "#);
}

#[test]
fn save_with_conditions() {
    shot_cst!("saveByName", @r#"
    saveByName
    ---
    Root
      Subject
        Prefix "save"
      Error
        KwBy "By"
        Attribute "Name"
    ---
    error at 4..6: unexpected token: `save` takes nothing after the prefix
    "#);
}

#[test]
fn missing_by() {
    shot_cst!("findNameLike", @r#"
    findNameLike
    ---
    Root
      Subject
        Prefix "find"
      Predicate
        Condition
          Attribute "Name"
          Operator "Like"
    ---
    error at 4..8: expected `By` before conditions (hint: conditions start after `By`, e.g. `findByName`)
    "#);
}

#[test]
fn by_without_condition() {
    shot_cst!("findBy", @r#"
    findBy
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
    ---
    error at 6..6: expected a condition: `By` must be followed by a condition
    "#);
}

#[test]
fn dangling_junction() {
    shot_cst!("findByNameAnd", @r#"
    findByNameAnd
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        AndExpr
          Condition
            Attribute "Name"
          KwAnd "And"
    ---
    error at 13..13: expected a condition: `And` must be followed by a condition
    "#);
}

#[test]
fn order_by_without_attribute() {
    shot_cst!("findByOrderBy", @r#"
    findByOrderBy
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      OrderBy
        KwOrderBy "OrderBy"
    ---
    error at 13..13: expected an attribute after `OrderBy` (hint: e.g. `OrderByLastNameAsc`)
    "#);
}

#[test]
fn first_on_count() {
    shot_cst!("countFirst5ByName", @r#"
    countFirst5ByName
    ---
    Root
      Subject
        Prefix "count"
        FirstClause
          KwFirst "First"
          Number "5"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
    ---
    error at 5..10: `First` is only allowed on `find` methods: found on a `count` method
    "#);
}

#[test]
fn double_negation() {
    shot_cst!("findByNameNotNotLike", @r#"
    findByNameNotNotLike
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
          KwNot "Not"
          Operator "NotLike"
    ---
    error at 13..20: `Not` followed by already negated `NotLike`
    "#);
}

#[test]
fn direction_outside_order_by() {
    shot_cst!("findByNameDesc", @r#"
    findByNameDesc
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
      Error
        KwDesc "Desc"
    ---
    error at 10..14: unexpected token: `Desc` outside `OrderBy`
    "#);
}

#[test]
fn update_without_assignments() {
    shot_cst!("updateByIdOrderByName", @r#"
    updateByIdOrderByName
    ---
    Root
      Subject
        Prefix "update"
      KwBy "By"
      Predicate
        Condition
          Attribute "Id"
      OrderBy
        KwOrderBy "OrderBy"
        SortTerm
          Attribute "Name"
    ---
    error at 10..17: expected `Set` or `Add` clauses
    "#);
}

#[test]
fn assignment_on_find() {
    shot_cst!("findByNameSetPrice", @r#"
    findByNameSetPrice
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
      Updates
        Assignment
          Assign "Set"
          Attribute "Price"
    ---
    error at 10..13: assignments are only allowed on `update` methods: found on a `find` method
    "#);
}

#[test]
fn unknown_fragment_is_wrapped() {
    shot_cst!("findByPriceBogus", @r#"
    findByPriceBogus
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Price"
      Error
        Garbage "Bogus"
    ---
    error at 11..16: `Bogus` is neither a keyword nor a known attribute
    "#);
}

#[test]
fn unknown_prefix() {
    shot_cst!("fetchByName", @r#"
    fetchByName
    ---
    Root
      Subject
        Error
          Garbage "fetch"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
    ---
    error at 0..5: `fetch` is neither a keyword nor a known attribute (hint: method names start with one of `find`, `count`, `delete`, `exists`, `update`, `save`)
    "#);
}

#[test]
fn missing_prefix() {
    shot_cst!("ByName", @r#"
    ByName
    ---
    Root
      Subject
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
    ---
    error at 0..2: method name must start with a query prefix; found `By`
    "#);
}

#[test]
fn empty_name() {
    insta::assert_snapshot!(crate::test_utils::cst(""), @r"
    Root
      Subject
    ---
    error at 0..0: method name must start with a query prefix
    ");
}

#[test]
fn stray_number() {
    shot_cst!("findByName7", @r#"
    findByName7
    ---
    Root
      Subject
        Prefix "find"
      KwBy "By"
      Predicate
        Condition
          Attribute "Name"
      Error
        Number "7"
    ---
    error at 10..11: a number must follow `First`: found `7`
    "#);
}

#[test]
fn fuel_exhaustion() {
    let source = "findByNameAndPriceAndDescription";
    let grammar = Grammar::standard();
    let model = product();
    let attributes = AttributeIndex::new(&model);
    let tokens = lex(source, &grammar, &attributes).tokens;

    let result = parse(source, tokens, &grammar, Some(3));
    assert!(
        matches!(result, Err(Error::ExecFuelExhausted)),
        "expected ExecFuelExhausted, got {result:?}"
    );
}

#[test]
fn fuel_is_counted_per_token() {
    let source = "findByName";
    let grammar = Grammar::standard();
    let model = product();
    let attributes = AttributeIndex::new(&model);
    let tokens = lex(source, &grammar, &attributes).tokens;

    let result = super::Parser::new(source, tokens, &grammar)
        .with_exec_fuel(Some(10))
        .parse()
        .unwrap();
    assert_eq!(result.exec_fuel_consumed, 3);
    assert!(result.diagnostics.is_empty());
}
