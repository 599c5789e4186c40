use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A schema position may hold a full schema or a bare boolean.
///
/// Anything that fits neither lands in `Other`, so one odd node does not
/// fail the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
    Other(serde_json::Value),
}

impl SchemaOrBool {
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrBool::Schema(schema) => Some(schema),
            SchemaOrBool::Bool(_) | SchemaOrBool::Other(_) => None,
        }
    }
}

/// The `type` field can be a single keyword or a list of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeField {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeField {
    /// The first non-`null` keyword, if any.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeField::Single(name) => Some(name.as_str()),
            TypeField::Multiple(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null"),
        }
    }

    pub fn includes_null(&self) -> bool {
        match self {
            TypeField::Single(name) => name == "null",
            TypeField::Multiple(names) => names.iter().any(|name| name == "null"),
        }
    }
}

/// `required` is a name list on objects, and some documents put a
/// boolean flag on the property schema itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredField {
    Names(Vec<String>),
    Flag(bool),
}

/// The JSON Schema subset shared by Swagger 2.0 and OpenAPI 3.x.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Wrapped schema, as found on Swagger 2.0 body parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<SchemaOrBool>>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrBool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredField>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<SchemaOrBool>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrBool>>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrBool>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrBool>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Schema {
    /// Names listed as required, plus properties flagged `required: true`.
    pub fn required_names(&self) -> Vec<String> {
        let mut names = match &self.required {
            Some(RequiredField::Names(names)) => names.clone(),
            _ => Vec::new(),
        };
        for (name, property) in &self.properties {
            let flagged = property
                .as_schema()
                .is_some_and(|s| matches!(s.required, Some(RequiredField::Flag(true))));
            if flagged && !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}
