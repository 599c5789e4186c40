use indexmap::IndexMap;
use minijinja::context;
use tsw_core::ir::SchemaTable;
use tsw_core::transform::name_sanitizer::compare_names;

use crate::doc::{render_block, schema_doc};
use crate::error::PluginError;
use crate::type_resolver::TypeResolver;

/// Spec-only type names exported as aliases of TypeScript primitives.
pub const PRIMITIVE_ALIASES: &[(&str, &str)] = &[
    ("integer", "number"),
    ("long", "number"),
    ("float", "number"),
    ("double", "number"),
    ("byte", "string"),
    ("binary", "string"),
    ("date", "string"),
    ("dateTime", "string"),
    ("password", "string"),
];

/// Arguments that are never replaced by a type variable: doing so would
/// also rewrite unrelated members of the same primitive type.
const KEYWORDS: &[&str] = &["string", "number", "boolean", "any", "object", "null"];

/// One exported type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Base name with its type-variable header, e.g. `Page<T>`.
    pub name: String,
    pub base_name: String,
    pub doc: Option<String>,
    pub body: String,
}

/// Everything the definitions module declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub declarations: Vec<Declaration>,
    /// `(alias, target)` pairs that do not clash with a declaration.
    pub aliases: Vec<(String, String)>,
}

impl Definitions {
    /// Declared base names, in declaration order.
    pub fn base_names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.base_name.as_str()).collect()
    }

    pub fn alias_names(&self) -> Vec<&str> {
        self.aliases.iter().map(|(name, _)| name.as_str()).collect()
    }
}

struct Variant {
    arity: usize,
    body: String,
    doc: Option<String>,
}

/// Build the declarations for a schema table.
///
/// Entries are visited in name order. Names of the form `Base<A, B>` are
/// generic instantiations: each argument is replaced in the rendered body
/// by a type variable, and all instantiations of one base name share a
/// single declaration.
pub fn build_definitions(table: &SchemaTable) -> Definitions {
    let resolver = TypeResolver::new(table);
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|a, b| compare_names(a.0, b.0));

    let mut groups: IndexMap<String, Vec<Variant>> = IndexMap::new();
    for (name, schema) in entries {
        let (base, args) = split_generic(name);
        let body = resolver.resolve(schema, 1, true).expr;
        groups.entry(base.to_string()).or_default().push(Variant {
            arity: args.len(),
            body: substitute(&body, &args),
            doc: schema_doc(&schema.meta),
        });
    }

    let declarations: Vec<Declaration> = groups
        .into_iter()
        .map(|(base, variants)| merge_variants(base, variants))
        .collect();
    let aliases = PRIMITIVE_ALIASES
        .iter()
        .filter(|(alias, _)| !declarations.iter().any(|d| d.base_name == *alias))
        .map(|(alias, target)| (alias.to_string(), target.to_string()))
        .collect();

    Definitions {
        declarations,
        aliases,
    }
}

fn merge_variants(base: String, variants: Vec<Variant>) -> Declaration {
    let arity = variants.iter().map(|v| v.arity).max().unwrap_or(0);
    let defaulted = arity > 0 && variants.iter().any(|v| v.arity < arity);

    let mut bodies: Vec<&str> = Vec::new();
    let mut docs: Vec<&str> = Vec::new();
    for variant in &variants {
        if !bodies.contains(&variant.body.as_str()) {
            bodies.push(&variant.body);
        }
        if let Some(doc) = variant.doc.as_deref()
            && !docs.contains(&doc)
        {
            docs.push(doc);
        }
    }
    if bodies.len() > 1 {
        log::warn!(
            "`{base}` has {} distinct shapes, declaring their union",
            bodies.len()
        );
    }

    let name = if arity == 0 {
        base.clone()
    } else {
        let vars: Vec<String> = (0..arity)
            .map(|i| {
                if defaulted {
                    format!("{} = any", generic_var(i))
                } else {
                    generic_var(i)
                }
            })
            .collect();
        format!("{base}<{}>", vars.join(", "))
    };

    Declaration {
        name,
        base_name: base,
        doc: render_block(&docs.join("\n"), ""),
        body: bodies.join(" | "),
    }
}

/// Split `Base<A, B<C>>` into `Base` and its top-level arguments.
pub fn split_generic(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('<') else {
        return (name, Vec::new());
    };
    let Some(inner) = name[open + 1..].strip_suffix('>') else {
        return (name, Vec::new());
    };
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args.retain(|arg| !arg.is_empty());
    (name[..open].trim_end(), args)
}

/// `T`, `U`, `V`, then `T3`, `T4`, ...
pub fn generic_var(index: usize) -> String {
    match index {
        0 => "T".to_string(),
        1 => "U".to_string(),
        2 => "V".to_string(),
        n => format!("T{n}"),
    }
}

/// Replace generic arguments in `body` by their type variables.
///
/// Longer arguments win over shorter ones at the same position, matches
/// must stand as whole identifiers, and comment lines are left alone.
fn substitute(body: &str, args: &[&str]) -> String {
    let mut candidates: Vec<(&str, String)> = args
        .iter()
        .enumerate()
        .filter(|(_, arg)| {
            !KEYWORDS.contains(*arg) && !PRIMITIVE_ALIASES.iter().any(|(alias, _)| alias == *arg)
        })
        .map(|(i, arg)| (*arg, generic_var(i)))
        .collect();
    if candidates.is_empty() {
        return body.to_string();
    }
    candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    body.split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("/*") || trimmed.starts_with('*') || trimmed.starts_with("//") {
                line.to_string()
            } else {
                substitute_line(line, &candidates)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn substitute_line(line: &str, candidates: &[(&str, String)]) -> String {
    let mut result = String::with_capacity(line.len());
    let mut index = 0;
    while index < line.len() {
        let rest = &line[index..];
        let before = line[..index].chars().next_back();
        let found = candidates.iter().find(|(arg, _)| {
            rest.starts_with(arg)
                && !before.is_some_and(is_word_char)
                && !rest[arg.len()..].chars().next().is_some_and(is_word_char)
        });
        match found {
            Some((arg, var)) => {
                result.push_str(var);
                index += arg.len();
            }
            None => {
                let Some(c) = rest.chars().next() else {
                    break;
                };
                result.push(c);
                index += c.len_utf8();
            }
        }
    }
    result
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Render the definitions module.
pub fn emit_definitions(definitions: &Definitions) -> Result<String, PluginError> {
    let mut env = super::environment();
    env.add_template("types.ts.j2", include_str!("../../templates/types.ts.j2"))?;
    let tmpl = env.get_template("types.ts.j2")?;

    let declarations: Vec<minijinja::Value> = definitions
        .declarations
        .iter()
        .map(|d| {
            context! {
                name => d.name,
                doc => d.doc,
                body => d.body,
            }
        })
        .collect();
    let aliases: Vec<minijinja::Value> = definitions
        .aliases
        .iter()
        .map(|(name, target)| context! { name => name, target => target })
        .collect();

    Ok(tmpl.render(context! {
        declarations => declarations,
        aliases => aliases,
    })?)
}
