use crate::{
    AttributeIndex, AttributeName, DynamicEntityModel, EntityModel, EntityModelError,
    TypeCategory, parse_entity,
};

const EMPLOYEE_JSON: &str = r#"{
    "name": "Employee",
    "attributes": [
        {"name": "id", "type": "numeric", "id": true},
        {"name": "lastName", "type": "string"},
        {"name": "yearHired", "type": "numeric"},
        {"name": "startDate", "type": "temporal"},
        {"name": "active", "type": "boolean"},
        {"name": "skills", "type": "collection"}
    ]
}"#;

#[test]
fn parse_raw_entity() {
    let raw = parse_entity(EMPLOYEE_JSON).unwrap();
    assert_eq!(raw.name, "Employee");
    assert_eq!(raw.attributes.len(), 6);

    let id = &raw.attributes[0];
    assert_eq!(id.name, "id");
    assert!(id.id);
    assert_eq!(id.category, TypeCategory::Numeric);

    let skills = raw.attributes.iter().find(|a| a.name == "skills").unwrap();
    assert_eq!(skills.category, TypeCategory::Collection);
    assert!(!skills.id);
}

#[test]
fn parse_rejects_unknown_category() {
    let json = r#"{"name": "X", "attributes": [{"name": "a", "type": "blob"}]}"#;
    assert!(parse_entity(json).is_err());
}

#[test]
fn dynamic_model_from_raw() {
    let raw = parse_entity(EMPLOYEE_JSON).unwrap();
    let model = DynamicEntityModel::from_raw(&raw).unwrap();

    assert_eq!(model.entity_name(), "Employee");
    assert_eq!(model.len(), 6);
    assert_eq!(model.id_attribute().map(|a| a.as_str()), Some("id"));

    let year = AttributeName::new("yearHired").unwrap();
    assert_eq!(model.type_category_of(&year), Some(TypeCategory::Numeric));
    assert!(model.has_attribute(&year));

    let missing = AttributeName::new("salary").unwrap();
    assert_eq!(model.type_category_of(&missing), None);
}

#[test]
fn dynamic_model_keeps_declaration_order() {
    let model = DynamicEntityModel::new("Product")
        .attribute("name", TypeCategory::String)
        .unwrap()
        .attribute("price", TypeCategory::Numeric)
        .unwrap();

    let names: Vec<_> = model.known_attributes().iter().map(|a| a.as_str()).collect();
    assert_eq!(names, ["name", "price"]);

    let categories: Vec<_> = model.iter().map(|(_, c)| c).collect();
    assert_eq!(categories, [TypeCategory::String, TypeCategory::Numeric]);
}

#[test]
fn dynamic_model_rejects_duplicates() {
    let err = DynamicEntityModel::new("Product")
        .attribute("name", TypeCategory::String)
        .unwrap()
        .attribute("name", TypeCategory::Numeric)
        .unwrap_err();
    assert_eq!(err, EntityModelError::DuplicateAttribute("name".into()));
}

#[test]
fn dynamic_model_rejects_case_collision() {
    let err = DynamicEntityModel::new("Product")
        .attribute("name", TypeCategory::String)
        .unwrap()
        .attribute("Name", TypeCategory::String)
        .unwrap_err();
    assert_eq!(err, EntityModelError::CaseCollision("name".into(), "Name".into()));
}

#[test]
fn dynamic_model_rejects_second_id() {
    let err = DynamicEntityModel::new("Product")
        .id("id", TypeCategory::Numeric)
        .unwrap()
        .id("sku", TypeCategory::String)
        .unwrap_err();
    assert_eq!(
        err,
        EntityModelError::MultipleIds {
            entity: "Product".into()
        }
    );
}

#[test]
fn attribute_name_must_be_identifier() {
    assert!(AttributeName::new("yearHired").is_ok());
    assert!(AttributeName::new("address2").is_ok());
    assert!(AttributeName::new("").is_err());
    assert!(AttributeName::new("address.city").is_err());
    assert!(AttributeName::new("2fast").is_err());
    assert!(AttributeName::new("first_name").is_err());
}

#[test]
fn attribute_name_capitalized() {
    let attr = AttributeName::new("yearHired").unwrap();
    assert_eq!(attr.capitalized(), "YearHired");
    assert_eq!(attr.to_string(), "yearHired");
}

#[test]
fn type_category_orderable() {
    assert!(TypeCategory::Numeric.is_orderable());
    assert!(TypeCategory::String.is_orderable());
    assert!(TypeCategory::Temporal.is_orderable());
    assert!(!TypeCategory::Boolean.is_orderable());
    assert!(!TypeCategory::Collection.is_orderable());
    assert!(!TypeCategory::Other.is_orderable());
}

#[test]
fn attribute_index_lookup_by_spelling() {
    let raw = parse_entity(EMPLOYEE_JSON).unwrap();
    let model = DynamicEntityModel::from_raw(&raw).unwrap();
    let index = AttributeIndex::new(&model);

    assert_eq!(index.len(), 6);
    assert_eq!(index.lookup("YearHired")[0].as_str(), "yearHired");
    assert!(index.lookup("yearHired").is_empty());

    let mut found: Vec<_> = index
        .prefixes_of("LastNameAndActive")
        .map(|(spelling, _)| spelling)
        .collect();
    found.sort();
    assert_eq!(found, ["LastName"]);
}

struct LooseModel {
    attributes: Vec<AttributeName>,
}

impl EntityModel for LooseModel {
    fn entity_name(&self) -> &str {
        "Loose"
    }
    fn known_attributes(&self) -> &[AttributeName] {
        &self.attributes
    }
    fn type_category_of(&self, _attribute: &AttributeName) -> Option<TypeCategory> {
        Some(TypeCategory::Other)
    }
}

#[test]
fn attribute_index_keeps_colliding_spellings() {
    let model = LooseModel {
        attributes: vec![
            AttributeName::new("url").unwrap(),
            AttributeName::new("Url").unwrap(),
        ],
    };
    let index = AttributeIndex::new(&model);
    assert_eq!(index.lookup("Url").len(), 2);
    assert!(model.id_attribute().is_none());
}
