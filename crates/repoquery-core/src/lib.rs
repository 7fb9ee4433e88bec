#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for repoquery entity and grammar information.
//!
//! Two layers:
//! - **Deserialization layer**: 1:1 mapping to an entity descriptor JSON
//! - **Analysis layer**: the `EntityModel` capability trait and lookups built on it
//!
//! `DynamicEntityModel` is the ready-made, HashMap-backed implementation.
//! The keyword vocabulary of method names lives in [`grammar`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod grammar;
pub mod utils;

mod invariants;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lib_tests;
#[cfg(test)]
mod utils_tests;

// ============================================================================
// Deserialization Layer
// ============================================================================

/// Raw entity definition from an entity descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntity {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
}

/// Raw attribute definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub category: TypeCategory,
    #[serde(default)]
    pub id: bool,
}

/// Parse entity descriptor content into a raw entity.
pub fn parse_entity(json: &str) -> Result<RawEntity, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Common Types
// ============================================================================

/// Coarse type classification of an entity attribute.
///
/// Operators are checked against this, not against concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Numeric,
    String,
    Temporal,
    Boolean,
    Collection,
    Other,
}

impl TypeCategory {
    /// Values of this category have a total order (comparisons, `Between`).
    pub fn is_orderable(self) -> bool {
        matches!(self, Self::Numeric | Self::String | Self::Temporal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Temporal => "temporal",
            Self::Boolean => "boolean",
            Self::Collection => "collection",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of an entity property, as declared (`yearHired`).
///
/// Always a dot-free identifier: an ASCII letter followed by ASCII
/// alphanumerics. Construct with [`AttributeName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn new(name: impl Into<String>) -> Result<Self, EntityModelError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(EntityModelError::InvalidAttributeName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Spelling used inside method names: first letter upper-cased.
    pub fn capitalized(&self) -> String {
        utils::capitalize(&self.0)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityModelError {
    #[error("invalid attribute name `{0}`: expected an ASCII letter followed by letters or digits")]
    InvalidAttributeName(String),
    #[error("attribute `{0}` is declared more than once")]
    DuplicateAttribute(String),
    #[error("attributes `{0}` and `{1}` are indistinguishable inside method names")]
    CaseCollision(String, String),
    #[error("entity `{entity}` declares more than one id attribute")]
    MultipleIds { entity: String },
}

// ============================================================================
// EntityModel Trait
// ============================================================================

/// Read-only attribute model of the entity a repository manages.
///
/// Provides only what query compilation needs:
/// - The set of known attribute names
/// - A type category per attribute (capability queries for operators)
/// - The identifier attribute, when the entity has one
pub trait EntityModel {
    fn entity_name(&self) -> &str;
    fn known_attributes(&self) -> &[AttributeName];
    fn type_category_of(&self, attribute: &AttributeName) -> Option<TypeCategory>;

    fn id_attribute(&self) -> Option<&AttributeName> {
        None
    }

    fn has_attribute(&self, attribute: &AttributeName) -> bool {
        self.type_category_of(attribute).is_some()
    }
}

impl<T: EntityModel + ?Sized> EntityModel for &T {
    fn entity_name(&self) -> &str {
        (*self).entity_name()
    }
    fn known_attributes(&self) -> &[AttributeName] {
        (*self).known_attributes()
    }
    fn type_category_of(&self, attribute: &AttributeName) -> Option<TypeCategory> {
        (*self).type_category_of(attribute)
    }
    fn id_attribute(&self) -> Option<&AttributeName> {
        (*self).id_attribute()
    }
    fn has_attribute(&self, attribute: &AttributeName) -> bool {
        (*self).has_attribute(attribute)
    }
}

// ============================================================================
// Dynamic Analysis Layer (runtime construction)
// ============================================================================

/// Attribute model built at runtime, either via the builder methods or from
/// a [`RawEntity`].
#[derive(Debug, Clone)]
pub struct DynamicEntityModel {
    name: String,
    attributes: Vec<AttributeName>,
    categories: HashMap<AttributeName, TypeCategory>,
    id: Option<AttributeName>,
}

impl DynamicEntityModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            categories: HashMap::new(),
            id: None,
        }
    }

    /// Declare an attribute.
    pub fn attribute(
        mut self,
        name: &str,
        category: TypeCategory,
    ) -> Result<Self, EntityModelError> {
        self.push(name, category)?;
        Ok(self)
    }

    /// Declare the identifier attribute.
    pub fn id(mut self, name: &str, category: TypeCategory) -> Result<Self, EntityModelError> {
        if self.id.is_some() {
            return Err(EntityModelError::MultipleIds { entity: self.name });
        }
        let attr = self.push(name, category)?;
        self.id = Some(attr);
        Ok(self)
    }

    /// Build from a deserialized entity descriptor.
    pub fn from_raw(raw: &RawEntity) -> Result<Self, EntityModelError> {
        let mut model = Self::new(raw.name.clone());
        for attr in &raw.attributes {
            model = if attr.id {
                model.id(&attr.name, attr.category)?
            } else {
                model.attribute(&attr.name, attr.category)?
            };
        }
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, TypeCategory)> {
        self.attributes
            .iter()
            .map(|name| (name, self.ensure_category(name)))
    }

    fn push(&mut self, name: &str, category: TypeCategory) -> Result<AttributeName, EntityModelError> {
        let attr = AttributeName::new(name)?;
        if self.categories.contains_key(&attr) {
            return Err(EntityModelError::DuplicateAttribute(name.to_string()));
        }
        let spelling = attr.capitalized();
        if let Some(other) = self.attributes.iter().find(|a| a.capitalized() == spelling) {
            return Err(EntityModelError::CaseCollision(
                other.to_string(),
                attr.to_string(),
            ));
        }
        self.categories.insert(attr.clone(), category);
        self.attributes.push(attr.clone());
        Ok(attr)
    }
}

impl EntityModel for DynamicEntityModel {
    fn entity_name(&self) -> &str {
        &self.name
    }

    fn known_attributes(&self) -> &[AttributeName] {
        &self.attributes
    }

    fn type_category_of(&self, attribute: &AttributeName) -> Option<TypeCategory> {
        self.categories.get(attribute).copied()
    }

    fn id_attribute(&self) -> Option<&AttributeName> {
        self.id.as_ref()
    }
}

// ============================================================================
// Method-name lookup
// ============================================================================

/// Attributes keyed by their method-name spelling (`YearHired`).
///
/// Models implemented outside this crate are not required to reject
/// first-letter case collisions, so a spelling may map to several attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    by_spelling: HashMap<String, Vec<AttributeName>>,
}

impl AttributeIndex {
    pub fn new<M: EntityModel + ?Sized>(model: &M) -> Self {
        let mut by_spelling: HashMap<String, Vec<AttributeName>> = HashMap::new();
        for attr in model.known_attributes() {
            by_spelling
                .entry(attr.capitalized())
                .or_default()
                .push(attr.clone());
        }
        Self { by_spelling }
    }

    /// Attributes spelled exactly `spelling` in a method name.
    pub fn lookup(&self, spelling: &str) -> &[AttributeName] {
        self.by_spelling
            .get(spelling)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Spellings that `text` starts with, paired with their matches.
    pub fn prefixes_of<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [AttributeName])> + 'a {
        self.by_spelling
            .iter()
            .filter(move |(spelling, _)| text.starts_with(spelling.as_str()))
            .map(|(spelling, attrs)| (spelling.as_str(), attrs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_spelling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_spelling.is_empty()
    }
}
