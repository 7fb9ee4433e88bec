//! Method signatures: the compiler's input besides the entity model.

use std::fmt;

use repoquery_core::TypeCategory;
use serde::{Deserialize, Serialize};

/// Declared shape of one method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// A single comparison value.
    Value(TypeCategory),
    /// A collection of values (operand of `In`).
    Collection(TypeCategory),
    /// Runtime result limit.
    Limit,
    /// Runtime sort criterion.
    Sort,
    /// Variadic runtime sort criteria.
    SortVarargs,
    /// Page request: pagination plus optional sort.
    Pageable,
    /// Entity to persist.
    Entity,
    /// Several entities to persist.
    Entities,
}

impl ParamKind {
    /// Parameters that shape the result instead of filling a condition operand.
    pub fn is_directive(self) -> bool {
        matches!(
            self,
            Self::Limit | Self::Sort | Self::SortVarargs | Self::Pageable
        )
    }

    pub fn is_entity(self) -> bool {
        matches!(self, Self::Entity | Self::Entities)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(c) => write!(f, "{c}"),
            Self::Collection(c) => write!(f, "collection of {c}"),
            Self::Limit => f.write_str("Limit"),
            Self::Sort => f.write_str("Sort"),
            Self::SortVarargs => f.write_str("Sort..."),
            Self::Pageable => f.write_str("Pageable"),
            Self::Entity => f.write_str("entity"),
            Self::Entities => f.write_str("entities"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
}

/// Declared return type, reduced to what the plan needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnShape {
    /// Exactly one entity; absence is an error at execution time.
    Entity,
    /// Zero or one entity.
    Optional,
    Sequence,
    /// Single-pass, scoped sequence.
    Stream,
    /// Ordered map of id to entity.
    Map,
    Page,
    Count,
    Boolean,
    Void,
}

impl ReturnShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Optional => "optional",
            Self::Sequence => "sequence",
            Self::Stream => "stream",
            Self::Map => "map",
            Self::Page => "page",
            Self::Count => "count",
            Self::Boolean => "boolean",
            Self::Void => "void",
        }
    }

    /// Returns at most one entity.
    pub fn is_single(self) -> bool {
        matches!(self, Self::Entity | Self::Optional)
    }
}

impl fmt::Display for ReturnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository method as seen by the compiler. Also the plan cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub interface: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub returns: ReturnShape,
}

impl MethodSignature {
    pub fn new(interface: impl Into<String>, name: impl Into<String>, returns: ReturnShape) -> Self {
        Self {
            interface: interface.into(),
            name: name.into(),
            parameters: Vec::new(),
            returns,
        }
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            kind,
        });
        self
    }

    /// `Interface::method`, used as the diagnostic path.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.interface, self.name)
    }
}
