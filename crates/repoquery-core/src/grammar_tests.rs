use crate::TypeCategory;
use crate::grammar::{
    Applicability, Arity, AssignOp, Grammar, GrammarError, Keyword, OperatorKind, OperatorSpec,
    PrefixKind,
};

#[test]
fn standard_prefixes() {
    let grammar = Grammar::standard();
    for prefix in PrefixKind::ALL {
        assert_eq!(grammar.prefix(prefix.as_str()), Some(prefix));
    }
    assert_eq!(grammar.prefix("fetch"), None);
    assert_eq!(grammar.prefix("Find"), None);
}

#[test]
fn structural_keywords() {
    let grammar = Grammar::standard();
    assert_eq!(grammar.keyword("By"), Some(Keyword::By));
    assert_eq!(grammar.keyword("OrderBy"), Some(Keyword::OrderBy));
    assert_eq!(grammar.keyword("First"), Some(Keyword::First));
    assert_eq!(grammar.keyword("Set"), Some(Keyword::Assign));
    assert_eq!(grammar.keyword("Like"), Some(Keyword::Operator));
    assert_eq!(grammar.keyword("Order"), None);
    assert_eq!(grammar.keyword("by"), None);
}

#[test]
fn negated_spellings_share_kind() {
    let grammar = Grammar::standard();
    let like = grammar.operator("Like").unwrap();
    let not_like = grammar.operator("NotLike").unwrap();
    assert_eq!(like.kind, OperatorKind::Like);
    assert_eq!(not_like.kind, OperatorKind::Like);
    assert!(!like.negated);
    assert!(not_like.negated);

    let not_null = grammar.operator("NotNull").unwrap();
    assert_eq!(not_null.kind, OperatorKind::Null);
    assert_eq!(not_null.arity, Arity::Zero);
    assert!(not_null.negated);

    assert!(grammar.operator("NotBetween").is_none());
}

#[test]
fn operator_arities() {
    let grammar = Grammar::standard();
    assert_eq!(grammar.operator("Between").unwrap().arity, Arity::Two);
    assert_eq!(grammar.operator("In").unwrap().arity, Arity::Many);
    assert_eq!(grammar.operator("True").unwrap().arity, Arity::Zero);
    assert_eq!(grammar.operator("LessThanEqual").unwrap().arity, Arity::One);
    assert_eq!(grammar.implicit_operator().kind, OperatorKind::Equal);

    assert_eq!(Arity::Many.operand_params(), 1);
    assert_eq!(Arity::Two.operand_params(), 2);
    assert_eq!(Arity::Many.to_string(), "N");
}

#[test]
fn applicability_by_category() {
    assert!(Applicability::Orderable.permits(TypeCategory::Temporal));
    assert!(!Applicability::Orderable.permits(TypeCategory::Boolean));
    assert!(Applicability::Text.permits(TypeCategory::String));
    assert!(!Applicability::Text.permits(TypeCategory::Numeric));
    assert!(Applicability::TextOrCollection.permits(TypeCategory::Collection));
    assert!(Applicability::Boolean.permits(TypeCategory::Boolean));
    assert!(Applicability::Any.permits(TypeCategory::Other));

    let custom = Applicability::Categories(vec![TypeCategory::Temporal]);
    assert!(custom.permits(TypeCategory::Temporal));
    assert!(!custom.permits(TypeCategory::String));
    assert_eq!(custom.describe(), "temporal attributes");
}

#[test]
fn assignments() {
    let grammar = Grammar::standard();
    assert_eq!(grammar.assignment("Set"), Some(AssignOp::Set));
    assert_eq!(grammar.assignment("Add"), Some(AssignOp::Add));
    assert_eq!(grammar.assignment("Multiply"), None);
}

#[test]
fn register_custom_operator() {
    let mut grammar = Grammar::standard();
    let spec = OperatorSpec::new(
        OperatorKind::Custom("Matches".into()),
        Arity::One,
        Applicability::Text,
    );
    grammar.register_operator("Matches", spec.clone()).unwrap();

    assert_eq!(grammar.keyword("Matches"), Some(Keyword::Operator));
    assert_eq!(grammar.operator("Matches"), Some(&spec));
    assert_eq!(spec.kind.to_string(), "Matches");

    // the standard table is untouched
    assert!(Grammar::standard().operator("Matches").is_none());
}

#[test]
fn register_alias_of_builtin() {
    let mut grammar = Grammar::standard();
    let equals = grammar.implicit_operator().clone();
    grammar.register_operator("Equals", equals).unwrap();
    assert_eq!(grammar.operator("Equals").unwrap().kind, OperatorKind::Equal);
}

#[test]
fn register_rejects_reserved_and_malformed() {
    let mut grammar = Grammar::standard();
    let spec = OperatorSpec::new(OperatorKind::Custom("X".into()), Arity::One, Applicability::Any);

    assert_eq!(
        grammar.register_operator("OrderBy", spec.clone()),
        Err(GrammarError::Reserved("OrderBy".into()))
    );
    assert_eq!(
        grammar.register_operator("Like", spec.clone()),
        Err(GrammarError::Reserved("Like".into()))
    );
    assert_eq!(
        grammar.register_operator("matches", spec.clone()),
        Err(GrammarError::InvalidSpelling("matches".into()))
    );
    assert_eq!(
        grammar.register_operator("Is2", spec),
        Err(GrammarError::InvalidSpelling("Is2".into()))
    );
}
