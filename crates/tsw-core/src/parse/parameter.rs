use serde::{Deserialize, Serialize};

use super::schema::{Schema, SchemaOrBool};

/// An API parameter, in either dialect.
///
/// Swagger 2.0 describes non-body parameters inline (`type`, `format`,
/// `items`, ...), OpenAPI 3.x and 2.0 body parameters wrap a `schema`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `path`, `query`, `header`, `cookie`, `body` or `formData`.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrBool>,

    #[serde(flatten)]
    pub inline: Schema,
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Box<Parameter>),
}
