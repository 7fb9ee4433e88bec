use repoquery_core::AttributeName;
use repoquery_core::grammar::{Arity, OperatorKind};
use repoquery_core::TypeCategory;

use super::{Condition, Direction, LimitSpec, PredicateNode, ResultShape, SortItem, SortTerm};
use crate::signature::{ParamKind, ReturnShape};
use crate::test_utils::{catalog, compile, employees};

const NUMERIC: ParamKind = ParamKind::Value(TypeCategory::Numeric);
const STRING: ParamKind = ParamKind::Value(TypeCategory::String);

fn condition(attribute: &str, operator: OperatorKind, operands: &[usize]) -> PredicateNode {
    PredicateNode::Condition(Condition {
        attribute: AttributeName::new(attribute).unwrap(),
        operator,
        negated: false,
        arity: Arity::One,
        operands: operands.to_vec(),
    })
}

#[test]
fn predicate_display() {
    let tree = PredicateNode::or(
        PredicateNode::and(
            condition("name", OperatorKind::Like, &[0]),
            condition("price", OperatorKind::LessThan, &[1]),
        ),
        condition("tags", OperatorKind::In, &[2]),
    );
    insta::assert_snapshot!(tree, @"(or (and (name Like ?0) (price LessThan ?1)) (tags In ?2))");
}

#[test]
fn negated_condition_display() {
    let node = PredicateNode::Condition(Condition {
        attribute: AttributeName::new("age").unwrap(),
        operator: OperatorKind::Between,
        negated: true,
        arity: Arity::Two,
        operands: vec![3, 4],
    });
    insta::assert_snapshot!(node, @"(not (age Between ?3 ?4))");
}

#[test]
fn conditions_pre_order() {
    let tree = PredicateNode::and(
        PredicateNode::or(
            condition("a", OperatorKind::Equal, &[0]),
            condition("b", OperatorKind::Equal, &[1]),
        ),
        PredicateNode::or(
            condition("c", OperatorKind::Equal, &[2]),
            condition("d", OperatorKind::Equal, &[3]),
        ),
    );
    let names: Vec<_> = tree.conditions().map(|c| c.attribute.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d"]);
}

#[test]
fn sort_item_display() {
    let items = [
        SortItem::Static(SortTerm {
            attribute: AttributeName::new("salary").unwrap(),
            direction: Direction::Desc,
        }),
        SortItem::Parameter(1),
        SortItem::Parameters(2),
        SortItem::Pageable(3),
    ];
    let rendered: Vec<_> = items.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["salary desc", "?1:sort", "?2:sort...", "?3:page"]);
    assert_eq!(items[0].parameter(), None);
    assert_eq!(items[3].parameter(), Some(3));
}

#[test]
fn limit_display() {
    let fixed = LimitSpec::Fixed { count: 25, offset: 0 };
    let skipped = LimitSpec::Fixed { count: 10, offset: 5 };
    assert_eq!(fixed.to_string(), "25");
    assert_eq!(skipped.to_string(), "10 offset 5");
    assert_eq!(LimitSpec::Parameter(2).to_string(), "?2");
}

#[test]
fn result_shape_display() {
    assert_eq!(ResultShape::BoundedList(25).to_string(), "bounded-list(25)");
    assert_eq!(ResultShape::MutationCount.to_string(), "mutation-count");
}

#[test]
fn parameter_accounting() {
    let sig = employees("findByLastNameLikeAndAgeBetweenOrderBySalaryDesc", ReturnShape::Page)
        .param("name", STRING)
        .param("min", NUMERIC)
        .param("max", NUMERIC)
        .param("sort", ParamKind::Sort)
        .param("page", ParamKind::Pageable);
    let plan = compile(&sig).unwrap();
    assert_eq!(plan.operand_count(), 3);
    assert_eq!(plan.directive_count(), 2);
    assert_eq!(plan.operand_count() + plan.directive_count(), sig.parameters.len());
    assert_eq!(plan.pagination(), Some(4));
    assert_eq!(plan.result(), ResultShape::Paged);
}

#[test]
fn update_accounting() {
    let sig = catalog("updateByIdSetModifiedOnAddPrice", ReturnShape::Count)
        .param("id", NUMERIC)
        .param("when", ParamKind::Value(TypeCategory::Temporal))
        .param("delta", NUMERIC);
    let plan = compile(&sig).unwrap();
    assert_eq!(plan.operand_count(), 3);
    assert_eq!(plan.directive_count(), 0);
    assert_eq!(plan.assignments().len(), 2);
}

#[test]
fn plan_without_predicate_has_no_conditions() {
    let sig = catalog("findByOrderByName", ReturnShape::Sequence);
    let plan = compile(&sig).unwrap();
    assert!(plan.predicate().is_none());
    assert_eq!(plan.conditions().count(), 0);
    assert_eq!(plan.operand_count(), 0);
}

#[test]
fn serialized_plan() {
    let sig = catalog("countByPriceGreaterThanEqual", ReturnShape::Count).param("price", NUMERIC);
    let plan = compile(&sig).unwrap();
    insta::assert_snapshot!(serde_json::to_string_pretty(&plan).unwrap(), @r#"
    {
      "prefix": "count",
      "predicate": {
        "condition": {
          "attribute": "price",
          "operator": "GreaterThanEqual",
          "negated": false,
          "arity": "One",
          "operands": [
            0
          ]
        }
      },
      "assignments": [],
      "sort": [],
      "limit": null,
      "pagination": null,
      "entity": null,
      "result": "counted",
      "returns": "count"
    }
    "#);
}

#[test]
fn serialized_sort_and_limit() {
    let sig = employees("findFirst25ByYearHiredOrderBySalaryDesc", ReturnShape::Sequence)
        .param("year", NUMERIC);
    let plan = compile(&sig).unwrap();
    let value = serde_json::json!({
        "sort": plan.sort(),
        "limit": plan.limit(),
        "result": plan.result(),
    });
    insta::assert_snapshot!(value.to_string(), @r#"{"limit":{"fixed":{"count":25,"offset":0}},"result":{"bounded-list":25},"sort":[{"static":{"attribute":"salary","direction":"desc"}}]}"#);
}
