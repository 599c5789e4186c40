use tsw_core::ir::{CompositionMode, ObjectSchema, PrimitiveType, Schema, SchemaKind, SchemaTable};
use tsw_core::transform::name_sanitizer::is_identifier;

use crate::doc::{render_block, schema_doc};

/// A type expression plus the documentation text of the schema it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub expr: String,
    pub doc: Option<String>,
}

/// Renders canonical schemas as TypeScript type expressions.
///
/// References resolve only against the schema table they were built with;
/// anything unknown becomes `any`.
pub struct TypeResolver<'a> {
    table: &'a SchemaTable,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SchemaTable) -> Self {
        Self { table }
    }

    /// Single-line expression without documentation.
    pub fn expr(&self, schema: &Schema) -> String {
        self.resolve(schema, -1, false).expr
    }

    /// Resolve `schema`.
    ///
    /// With `max_depth > 0` objects render one member per line, each member
    /// preceded by its documentation block; members are resolved with
    /// `max_depth - 1`. A negative `max_depth`, or `suppress_comment`, leaves
    /// `doc` empty.
    pub fn resolve(&self, schema: &Schema, max_depth: i32, suppress_comment: bool) -> ResolvedType {
        let doc = if max_depth >= 0 && !suppress_comment {
            schema_doc(&schema.meta)
        } else {
            None
        };
        ResolvedType {
            expr: self.render(schema, max_depth),
            doc,
        }
    }

    fn render(&self, schema: &Schema, max_depth: i32) -> String {
        let nullable = |expr: String| {
            if schema.meta.nullable {
                format!("{expr} | null")
            } else {
                expr
            }
        };
        match &schema.kind {
            SchemaKind::Ref(name) if self.table.contains(name) => name.clone(),
            SchemaKind::Ref(_) | SchemaKind::Any => "any".to_string(),
            SchemaKind::Composition { mode, parts } => self.render_composition(*mode, parts, max_depth),
            SchemaKind::Enum(values) => nullable(
                values
                    .iter()
                    .map(|v| v.to_string().replace('"', "'"))
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
            SchemaKind::File => "File".to_string(),
            SchemaKind::Array(item) => {
                let item = self.render(item, max_depth);
                if item == "File" {
                    "File[] | FileList".to_string()
                } else {
                    format!("Array<{item}>")
                }
            }
            SchemaKind::Object(object) => self.render_object(object, max_depth),
            SchemaKind::Primitive {
                primitive: PrimitiveType::String,
                format: Some(format),
            } if format == "binary" => nullable("File".to_string()),
            SchemaKind::Primitive { primitive, .. } => nullable(primitive.as_str().to_string()),
        }
    }

    fn render_composition(&self, mode: CompositionMode, parts: &[Schema], max_depth: i32) -> String {
        if parts.is_empty() {
            return "any".to_string();
        }
        let rendered: Vec<String> = parts.iter().map(|p| self.render(p, max_depth)).collect();
        match mode {
            CompositionMode::OneOf => rendered.join(" | "),
            CompositionMode::AllOf => rendered
                .into_iter()
                .map(|part| {
                    if part.contains(" | ") {
                        format!("({part})")
                    } else {
                        part
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }

    fn render_object(&self, object: &ObjectSchema, max_depth: i32) -> String {
        let mut members: Vec<(String, &Schema)> = object
            .properties
            .iter()
            .map(|(name, schema)| {
                let optional = if object.is_required(name) { "" } else { "?" };
                (format!("{}{optional}", member_key(name)), schema)
            })
            .collect();
        if let Some(additional) = &object.additional_properties {
            members.push(("[key: string]".to_string(), additional));
        }
        if members.is_empty() {
            return "any".to_string();
        }

        let members: Vec<(String, Option<String>)> = members
            .into_iter()
            .map(|(key, schema)| {
                let resolved = self.resolve(schema, max_depth - 1, false);
                (format!("{key}: {}", resolved.expr), resolved.doc)
            })
            .collect();

        if max_depth <= 0 {
            let inline: Vec<String> = members.into_iter().map(|(line, _)| line).collect();
            return format!("{{ {} }}", inline.join(", "));
        }

        let mut lines = Vec::new();
        for (line, doc) in members {
            if let Some(block) = doc.as_deref().and_then(|d| render_block(d, "")) {
                lines.extend(block.lines().map(str::to_string));
            }
            lines.extend(line.lines().map(str::to_string));
        }
        let body: Vec<String> = lines
            .into_iter()
            .map(|line| {
                if line.is_empty() {
                    line
                } else {
                    format!("  {line}")
                }
            })
            .collect();
        format!("{{\n{}\n}}", body.join("\n"))
    }
}

fn member_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}
