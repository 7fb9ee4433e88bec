//! Keyword vocabulary of repository method names.
//!
//! The table is an explicit, immutable value handed to the compiler. The
//! standard table covers the built-in prefixes and operators; additional
//! operators are registered on an owned copy before compilation starts.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::TypeCategory;

/// Leading verb of a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixKind {
    Find,
    Count,
    Delete,
    Exists,
    Update,
    Save,
}

impl PrefixKind {
    pub const ALL: [PrefixKind; 6] = [
        Self::Find,
        Self::Count,
        Self::Delete,
        Self::Exists,
        Self::Update,
        Self::Save,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::Count => "count",
            Self::Delete => "delete",
            Self::Exists => "exists",
            Self::Update => "update",
            Self::Save => "save",
        }
    }

    /// Whether the method reads entities back (as opposed to an aggregate or a write).
    pub fn is_find(self) -> bool {
        matches!(self, Self::Find)
    }
}

impl fmt::Display for PrefixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of operand values a condition takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    Zero,
    One,
    Two,
    /// N values carried by a single collection-typed parameter.
    Many,
}

impl Arity {
    /// Parameters consumed from the method signature.
    pub fn operand_params(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One | Self::Many => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::One => f.write_str("1"),
            Self::Two => f.write_str("2"),
            Self::Many => f.write_str("N"),
        }
    }
}

/// Attribute categories an operator can be applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    Any,
    Orderable,
    Text,
    TextOrCollection,
    Boolean,
    Categories(Vec<TypeCategory>),
}

impl Applicability {
    pub fn permits(&self, category: TypeCategory) -> bool {
        match self {
            Self::Any => true,
            Self::Orderable => category.is_orderable(),
            Self::Text => category == TypeCategory::String,
            Self::TextOrCollection => {
                matches!(category, TypeCategory::String | TypeCategory::Collection)
            }
            Self::Boolean => category == TypeCategory::Boolean,
            Self::Categories(categories) => categories.contains(&category),
        }
    }

    /// Human-readable list for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "any attribute".to_string(),
            Self::Orderable => "numeric, string or temporal attributes".to_string(),
            Self::Text => "string attributes".to_string(),
            Self::TextOrCollection => "string or collection attributes".to_string(),
            Self::Boolean => "boolean attributes".to_string(),
            Self::Categories(categories) => {
                let names: Vec<_> = categories.iter().map(|c| c.as_str()).collect();
                format!("{} attributes", names.join(" or "))
            }
        }
    }
}

/// Comparison performed by a condition.
///
/// Negated spellings (`NotLike`, `NotIn`, ...) map to the positive kind with
/// [`OperatorSpec::negated`] set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Equal,
    Like,
    Between,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Contains,
    StartsWith,
    EndsWith,
    In,
    Null,
    True,
    False,
    /// Operator registered through [`Grammar::register_operator`].
    Custom(String),
}

impl OperatorKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Equal => "Equal",
            Self::Like => "Like",
            Self::Between => "Between",
            Self::LessThan => "LessThan",
            Self::LessThanEqual => "LessThanEqual",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanEqual => "GreaterThanEqual",
            Self::Contains => "Contains",
            Self::StartsWith => "StartsWith",
            Self::EndsWith => "EndsWith",
            Self::In => "In",
            Self::Null => "Null",
            Self::True => "True",
            Self::False => "False",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grammar entry for one operator spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSpec {
    pub kind: OperatorKind,
    pub arity: Arity,
    pub negated: bool,
    pub applies_to: Applicability,
}

impl OperatorSpec {
    pub fn new(kind: OperatorKind, arity: Arity, applies_to: Applicability) -> Self {
        Self {
            kind,
            arity,
            negated: false,
            applies_to,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

/// Update clause operation (`updateByIdSetNameAddPrice`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Set,
    Add,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "Set",
            Self::Add => "Add",
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a capitalized keyword spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    By,
    And,
    Or,
    Not,
    OrderBy,
    Asc,
    Desc,
    First,
    Operator,
    Assign,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("operator spelling `{0}` must be an upper-case ASCII letter followed by letters")]
    InvalidSpelling(String),
    #[error("`{0}` is already a keyword")]
    Reserved(String),
}

/// Immutable keyword table consulted by the lexer, parser and binder.
#[derive(Debug, Clone)]
pub struct Grammar {
    prefixes: IndexMap<&'static str, PrefixKind>,
    keywords: IndexMap<String, Keyword>,
    operators: IndexMap<String, OperatorSpec>,
    assignments: IndexMap<&'static str, AssignOp>,
    equal: OperatorSpec,
}

impl Grammar {
    /// The built-in vocabulary.
    pub fn standard() -> Self {
        let mut grammar = Self {
            prefixes: PrefixKind::ALL.iter().map(|p| (p.as_str(), *p)).collect(),
            keywords: IndexMap::new(),
            operators: IndexMap::new(),
            assignments: [AssignOp::Set, AssignOp::Add]
                .iter()
                .map(|a| (a.as_str(), *a))
                .collect(),
            equal: OperatorSpec::new(OperatorKind::Equal, Arity::One, Applicability::Any),
        };

        for (spelling, keyword) in [
            ("By", Keyword::By),
            ("And", Keyword::And),
            ("Or", Keyword::Or),
            ("Not", Keyword::Not),
            ("OrderBy", Keyword::OrderBy),
            ("Asc", Keyword::Asc),
            ("Desc", Keyword::Desc),
            ("First", Keyword::First),
            ("Set", Keyword::Assign),
            ("Add", Keyword::Assign),
        ] {
            grammar.keywords.insert(spelling.to_string(), keyword);
        }

        use Applicability as A;
        use OperatorKind as K;
        let builtin = [
            ("Like", OperatorSpec::new(K::Like, Arity::One, A::Text)),
            ("Between", OperatorSpec::new(K::Between, Arity::Two, A::Orderable)),
            ("LessThan", OperatorSpec::new(K::LessThan, Arity::One, A::Orderable)),
            ("LessThanEqual", OperatorSpec::new(K::LessThanEqual, Arity::One, A::Orderable)),
            ("GreaterThan", OperatorSpec::new(K::GreaterThan, Arity::One, A::Orderable)),
            ("GreaterThanEqual", OperatorSpec::new(K::GreaterThanEqual, Arity::One, A::Orderable)),
            ("Contains", OperatorSpec::new(K::Contains, Arity::One, A::TextOrCollection)),
            ("StartsWith", OperatorSpec::new(K::StartsWith, Arity::One, A::Text)),
            ("EndsWith", OperatorSpec::new(K::EndsWith, Arity::One, A::Text)),
            ("In", OperatorSpec::new(K::In, Arity::Many, A::Any)),
            ("Null", OperatorSpec::new(K::Null, Arity::Zero, A::Any)),
            ("True", OperatorSpec::new(K::True, Arity::Zero, A::Boolean)),
            ("False", OperatorSpec::new(K::False, Arity::Zero, A::Boolean)),
        ];
        for (spelling, spec) in builtin {
            grammar.insert_operator(spelling.to_string(), spec);
        }

        for positive in ["Like", "Contains", "In", "Null"] {
            if let Some(spec) = grammar.operators.get(positive).cloned() {
                grammar.insert_operator(format!("Not{positive}"), spec.negate());
            }
        }

        grammar
    }

    /// Add an operator spelling to the table.
    ///
    /// The spelling must be capitalized ASCII letters and must not shadow an
    /// existing keyword. Aliases of built-in kinds are allowed.
    pub fn register_operator(
        &mut self,
        spelling: &str,
        spec: OperatorSpec,
    ) -> Result<(), GrammarError> {
        let mut chars = spelling.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(GrammarError::InvalidSpelling(spelling.to_string()));
        }
        if self.keywords.contains_key(spelling) {
            return Err(GrammarError::Reserved(spelling.to_string()));
        }
        self.insert_operator(spelling.to_string(), spec);
        Ok(())
    }

    fn insert_operator(&mut self, spelling: String, spec: OperatorSpec) {
        self.keywords.insert(spelling.clone(), Keyword::Operator);
        self.operators.insert(spelling, spec);
    }

    pub fn prefix(&self, text: &str) -> Option<PrefixKind> {
        self.prefixes.get(text).copied()
    }

    pub fn keyword(&self, spelling: &str) -> Option<Keyword> {
        self.keywords.get(spelling).copied()
    }

    /// All capitalized keyword spellings in registration order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, Keyword)> {
        self.keywords.iter().map(|(s, k)| (s.as_str(), *k))
    }

    pub fn operator(&self, spelling: &str) -> Option<&OperatorSpec> {
        self.operators.get(spelling)
    }

    /// Operator applied when a condition names no operator.
    pub fn implicit_operator(&self) -> &OperatorSpec {
        &self.equal
    }

    pub fn assignment(&self, spelling: &str) -> Option<AssignOp> {
        self.assignments.get(spelling).copied()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}
