pub mod operation;
pub mod parameter;
pub mod schema;
pub mod spec;

use serde_json::Value;

use crate::error::ParseError;
use spec::RawSpec;

/// Parse a Swagger 2.0 or OpenAPI 3.x document from YAML.
pub fn from_yaml(input: &str) -> Result<RawSpec, ParseError> {
    let value: Value = serde_yaml_ng::from_str(input)?;
    from_value(value)
}

/// Parse a Swagger 2.0 or OpenAPI 3.x document from JSON.
pub fn from_json(input: &str) -> Result<RawSpec, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

/// Parse a document, treating input that starts with `{` as JSON and
/// anything else as YAML.
pub fn from_str(input: &str) -> Result<RawSpec, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

fn from_value(mut value: Value) -> Result<RawSpec, ParseError> {
    for key in ["swagger", "openapi"] {
        if let Some(field) = value.get_mut(key) {
            if !field.is_string() {
                *field = Value::String(version_label(field));
            }
        }
    }
    let swagger = value.get("swagger").and_then(Value::as_str);
    let openapi = value.get("openapi").and_then(Value::as_str);
    match (swagger, openapi) {
        (Some("2.0"), _) => Ok(RawSpec::Swagger2(serde_json::from_value(value)?)),
        (_, Some(version)) if version.starts_with('3') => {
            Ok(RawSpec::OpenApi3(serde_json::from_value(value)?))
        }
        (_, Some(version)) => Err(ParseError::UnsupportedVersion(format!("openapi {version}"))),
        (Some(version), None) => Err(ParseError::UnsupportedVersion(format!("swagger {version}"))),
        (None, None) => Err(ParseError::UnsupportedVersion(
            "document declares neither `swagger` nor `openapi`".to_string(),
        )),
    }
}

/// YAML may hand the version over as a number (`openapi: 3.0`).
fn version_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
