use crate::ir::{CompositionMode, ObjectSchema, PrimitiveType, Schema, SchemaKind, SchemaMeta};
use crate::parse::schema::{Schema as RawSchema, SchemaOrBool};

use super::name_sanitizer::sanitize_name;

/// Convert a raw schema position into canonical form.
///
/// Precedence: wrapped `schema`, `$ref`, `allOf`, `oneOf`, `enum`, then
/// the `type` keyword. A boolean schema, an unrecognized node, or one
/// without a `type` carries no shape and becomes `Any`.
pub fn convert_schema(raw: &SchemaOrBool) -> Schema {
    match raw {
        SchemaOrBool::Bool(_) => Schema::any(),
        SchemaOrBool::Schema(schema) => convert_raw_schema(schema),
        SchemaOrBool::Other(value) => {
            log::debug!("unrecognized schema node `{value}`, treating as any");
            Schema::any()
        }
    }
}

pub fn convert_raw_schema(raw: &RawSchema) -> Schema {
    if let Some(inner) = &raw.schema {
        return convert_schema(inner);
    }
    Schema {
        kind: convert_kind(raw),
        meta: convert_meta(raw),
    }
}

fn convert_meta(raw: &RawSchema) -> SchemaMeta {
    let listed_null = raw.schema_type.as_ref().is_some_and(|t| {
        t.includes_null() && t.primary().is_some_and(|primary| primary != "null")
    });
    SchemaMeta {
        title: raw.title.clone(),
        description: raw.description.clone(),
        example: raw.example.clone(),
        nullable: raw.nullable.unwrap_or(false) || listed_null,
    }
}

fn convert_kind(raw: &RawSchema) -> SchemaKind {
    if let Some(reference) = &raw.reference {
        return SchemaKind::Ref(sanitize_name(reference));
    }
    if !raw.all_of.is_empty() {
        return composition(CompositionMode::AllOf, &raw.all_of);
    }
    if !raw.one_of.is_empty() {
        return composition(CompositionMode::OneOf, &raw.one_of);
    }
    if !raw.enum_values.is_empty() {
        return SchemaKind::Enum(raw.enum_values.clone());
    }

    let Some(keyword) = raw.schema_type.as_ref().and_then(|t| t.primary()) else {
        return SchemaKind::Any;
    };
    match keyword {
        "file" => SchemaKind::File,
        "array" => SchemaKind::Array(Box::new(
            raw.items
                .as_deref()
                .map(convert_schema)
                .unwrap_or_else(Schema::any),
        )),
        "object" => SchemaKind::Object(convert_object(raw)),
        other => match PrimitiveType::from_keyword(other) {
            Some(primitive) => SchemaKind::Primitive {
                primitive,
                format: raw.format.clone(),
            },
            None => {
                log::debug!("unknown schema type `{other}`, treating as any");
                SchemaKind::Any
            }
        },
    }
}

fn composition(mode: CompositionMode, parts: &[SchemaOrBool]) -> SchemaKind {
    SchemaKind::Composition {
        mode,
        parts: parts.iter().map(convert_schema).collect(),
    }
}

fn convert_object(raw: &RawSchema) -> ObjectSchema {
    let properties = raw
        .properties
        .iter()
        .map(|(name, property)| (name.clone(), convert_schema(property)))
        .collect();
    let additional_properties = match &raw.additional_properties {
        Some(SchemaOrBool::Bool(true)) => Some(Box::new(Schema::any())),
        Some(SchemaOrBool::Schema(schema)) => Some(Box::new(convert_raw_schema(schema))),
        Some(SchemaOrBool::Bool(false) | SchemaOrBool::Other(_)) | None => None,
    };
    ObjectSchema {
        properties,
        required: raw.required_names(),
        additional_properties,
    }
}
