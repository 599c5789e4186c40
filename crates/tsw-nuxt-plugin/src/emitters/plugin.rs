use minijinja::context;
use tsw_core::config::{ArgumentForm, GenerateOptions, RUNTIME_CONFIG_KEY};
use tsw_core::ir::ApiDocument;
use tsw_core::transform::name_sanitizer::compare_names;

use super::call_site::{CallSite, emit_call_site};
use super::definitions::Definitions;
use crate::code_tree::{CodeNode, Curried, Property, render_object};
use crate::doc::params_doc;
use crate::error::PluginError;
use crate::params::{Argument, NormalizedParameter, classify, group};
use crate::path_tree::{PathEntry, PathNode, PathTree, curried_parameters};
use crate::type_resolver::TypeResolver;

/// An operation's emitted call plus the path parameters it declared.
struct Site {
    call: CallSite,
    path_params: Vec<NormalizedParameter>,
}

/// Build the accessor object for every operation in `document`.
pub fn build_code_tree(document: &ApiDocument, options: &GenerateOptions) -> Vec<Property> {
    let resolver = TypeResolver::new(&document.schemas);
    let sites: Vec<Site> = document
        .operations
        .iter()
        .map(|op| {
            let curried = match options.form {
                ArgumentForm::Default => curried_parameters(&op.path, &options.base_path, options.form),
                ArgumentForm::Underscore => Vec::new(),
            };
            let params = classify(op, &resolver, options.skip_header);
            let groups = group(&op.path, params, options.form, &options.thresholds, &curried);
            Site {
                call: emit_call_site(op, &groups, &resolver),
                path_params: groups.path,
            }
        })
        .collect();

    let tree = PathTree::build(&document.operations, &options.base_path, options.form);
    node_properties(&tree.root, &sites)
}

fn node_properties(node: &PathNode, sites: &[Site]) -> Vec<Property> {
    node.entries
        .iter()
        .map(|(key, entry)| match entry {
            PathEntry::Leaf(index) => Property {
                key: key.clone(),
                doc: sites[*index].call.doc.clone(),
                value: CodeNode::Call(sites[*index].call.code.clone()),
            },
            PathEntry::Branch(child) => match &child.curried {
                Some(curried) => {
                    let bound = bound_parameters(curried, key, sites);
                    Property {
                        key: key.clone(),
                        doc: curried_doc(&bound),
                        value: CodeNode::Curried(Curried {
                            param: key.clone(),
                            param_type: curried_type(&bound),
                            body: node_properties(curried, sites),
                            members: node_properties(child, sites),
                        }),
                    }
                }
                None => Property {
                    key: key.clone(),
                    doc: None,
                    value: CodeNode::Object(node_properties(child, sites)),
                },
            },
        })
        .collect()
}

/// Declarations of the path parameter `name` by every operation below
/// `node`.
fn bound_parameters<'a>(node: &PathNode, name: &str, sites: &'a [Site]) -> Vec<&'a NormalizedParameter> {
    let mut found = Vec::new();
    collect_bound(node, name, sites, &mut found);
    found
}

fn collect_bound<'a>(
    node: &PathNode,
    name: &str,
    sites: &'a [Site],
    found: &mut Vec<&'a NormalizedParameter>,
) {
    for entry in node.entries.values() {
        match entry {
            PathEntry::Leaf(index) => found.extend(
                sites[*index]
                    .path_params
                    .iter()
                    .filter(|p| p.val_name == name),
            ),
            PathEntry::Branch(child) => collect_bound(child, name, sites, found),
        }
    }
    if let Some(curried) = &node.curried {
        collect_bound(curried, name, sites, found);
    }
}

/// Union of the distinct declared types, `any` when undeclared.
fn curried_type(bound: &[&NormalizedParameter]) -> String {
    let mut types: Vec<&str> = Vec::new();
    for param in bound {
        if !types.contains(&param.type_expr.as_str()) {
            types.push(&param.type_expr);
        }
    }
    if types.is_empty() {
        "any".to_string()
    } else {
        types.join(" | ")
    }
}

fn curried_doc(bound: &[&NormalizedParameter]) -> Option<String> {
    bound
        .iter()
        .map(|param| params_doc(&[Argument::Single((*param).clone())]))
        .filter(|doc| !doc.is_empty())
        .max_by_key(String::len)
}

/// Render the plugin module.
pub fn emit_plugin(
    document: &ApiDocument,
    definitions: &Definitions,
    options: &GenerateOptions,
) -> Result<String, PluginError> {
    let mut env = super::environment();
    env.add_template("plugin.ts.j2", include_str!("../../templates/plugin.ts.j2"))?;
    let tmpl = env.get_template("plugin.ts.j2")?;

    let properties = build_code_tree(document, options);
    let depth = usize::from(options.axios_config);
    let object = render_object(&properties, depth);

    let mut type_names = definitions.base_names();
    type_names.sort_by(|a, b| compare_names(a, b));
    let mut alias_names = definitions.alias_names();
    alias_names.sort_by(|a, b| compare_names(a, b));

    Ok(tmpl.render(context! {
        type_names => type_names,
        alias_names => alias_names,
        type_path => options.rel_type_path,
        inject => options.inject,
        plugin_name => options.plugin_name,
        runtime_key => RUNTIME_CONFIG_KEY,
        axios_config => options.axios_config,
        has_multipart => document.operations.iter().any(|op| op.is_multipart()),
        object => object,
    })?)
}
