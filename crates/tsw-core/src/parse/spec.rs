use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::{PathItem, RequestBody, Response};
use super::parameter::Parameter;
use super::schema::SchemaOrBool;

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwaggerSpec {
    pub swagger: String,

    #[serde(default)]
    pub info: Info,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaOrBool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

/// Reusable OpenAPI 3.x components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrBool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBody>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

/// An OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub components: Components,
}

/// A parsed document of either supported dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSpec {
    Swagger2(SwaggerSpec),
    OpenApi3(OpenApiSpec),
}

impl RawSpec {
    pub fn version(&self) -> &str {
        match self {
            RawSpec::Swagger2(spec) => &spec.swagger,
            RawSpec::OpenApi3(spec) => &spec.openapi,
        }
    }

    pub fn info(&self) -> &Info {
        match self {
            RawSpec::Swagger2(spec) => &spec.info,
            RawSpec::OpenApi3(spec) => &spec.info,
        }
    }
}
