use tsw_core::config::{ArgumentForm, GroupingThresholds};
use tsw_core::ir::{Operation, ParameterLocation};
use tsw_core::transform::name_sanitizer::value_identifier;

use crate::type_resolver::TypeResolver;

pub const BODY_NAME: &str = "$body";
pub const CONFIG_NAME: &str = "$config";
pub const CONFIG_TYPE: &str = "AxiosRequestConfig";

/// Where a normalized parameter ends up in the axios call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPosition {
    Path,
    Query,
    Header,
    Body,
    FormData,
    /// The trailing `$config` passthrough.
    Config,
    /// Cookies and unknown locations: accepted as arguments, never sent.
    Rest,
}

/// A parameter ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParameter {
    /// Wire name.
    pub name: String,
    /// Identifier used in generated code.
    pub val_name: String,
    pub position: ParamPosition,
    pub type_expr: String,
    pub required: bool,
    pub description: String,
    pub multipart: bool,
}

impl NormalizedParameter {
    fn signature(&self) -> String {
        let optional = if self.required { "" } else { "?" };
        format!("{}{optional}: {}", self.val_name, self.type_expr)
    }

    /// Object-literal entry sending this parameter under its wire name.
    pub fn wire_entry(&self) -> String {
        if self.name == self.val_name {
            self.name.clone()
        } else {
            format!("'{}': {}", self.name.replace('\'', "\\'"), self.val_name)
        }
    }
}

/// One positional argument of a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Single(NormalizedParameter),
    /// Several parameters destructured from one object argument.
    Bundle(Vec<NormalizedParameter>),
}

impl Argument {
    pub fn is_required(&self) -> bool {
        match self {
            Argument::Single(param) => param.required,
            Argument::Bundle(members) => members.iter().any(|m| m.required),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Argument::Single(param) => param.signature(),
            Argument::Bundle(members) => {
                let names: Vec<&str> = members.iter().map(|m| m.val_name.as_str()).collect();
                let types: Vec<String> = members.iter().map(NormalizedParameter::signature).collect();
                let default = if self.is_required() { "" } else { " = {}" };
                format!("{{ {} }}: {{ {} }}{default}", names.join(", "), types.join(", "))
            }
        }
    }
}

/// Render an argument list as a TypeScript parameter list.
pub fn render_arguments(args: &[Argument]) -> String {
    args.iter()
        .map(Argument::render)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameters of one operation split by position, plus the argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterGroups {
    /// Ordered by first appearance in the URL.
    pub path: Vec<NormalizedParameter>,
    pub query: Vec<NormalizedParameter>,
    pub header: Vec<NormalizedParameter>,
    pub form_data: Vec<NormalizedParameter>,
    pub rest: Vec<NormalizedParameter>,
    pub body: Option<NormalizedParameter>,
    pub config: Option<NormalizedParameter>,
    pub arguments: Vec<Argument>,
}

/// Normalize the declared parameters and request body of `op`, then
/// append the `$config` passthrough.
///
/// Nameless parameters are dropped. Body and path parameters default to
/// required. Header parameters are dropped when `skip_header` is set.
pub fn classify(
    op: &Operation,
    resolver: &TypeResolver<'_>,
    skip_header: bool,
) -> Vec<NormalizedParameter> {
    let mut params = Vec::new();
    for param in &op.parameters {
        if param.name.is_empty() {
            continue;
        }
        let position = match param.location {
            ParameterLocation::Path => ParamPosition::Path,
            ParameterLocation::Query => ParamPosition::Query,
            ParameterLocation::Header => ParamPosition::Header,
            ParameterLocation::Body => ParamPosition::Body,
            ParameterLocation::FormData => ParamPosition::FormData,
            ParameterLocation::Cookie | ParameterLocation::Other => ParamPosition::Rest,
        };
        if skip_header && position == ParamPosition::Header {
            continue;
        }
        let name = if position == ParamPosition::Body {
            BODY_NAME.to_string()
        } else {
            param.name.clone()
        };
        params.push(NormalizedParameter {
            val_name: value_identifier(&name),
            name,
            position,
            type_expr: resolver.expr(&param.schema),
            required: param.required.unwrap_or(matches!(
                position,
                ParamPosition::Body | ParamPosition::Path
            )),
            description: param.description.clone().unwrap_or_default(),
            multipart: position == ParamPosition::FormData,
        });
    }

    for name in duplicate_identifiers(&params) {
        log::warn!(
            "{} {}: several parameters map to the identifier `{name}`",
            op.method.as_str(),
            op.path
        );
    }

    if let Some(body) = &op.request_body {
        params.push(NormalizedParameter {
            name: BODY_NAME.to_string(),
            val_name: BODY_NAME.to_string(),
            position: ParamPosition::Body,
            type_expr: resolver.expr(&body.schema),
            required: body.required.unwrap_or(true),
            description: body.description.clone().unwrap_or_default(),
            multipart: body.multipart,
        });
    }

    params.push(NormalizedParameter {
        name: CONFIG_NAME.to_string(),
        val_name: CONFIG_NAME.to_string(),
        position: ParamPosition::Config,
        type_expr: CONFIG_TYPE.to_string(),
        required: false,
        description: String::new(),
        multipart: false,
    });
    params
}

/// Identifiers claimed by more than one parameter, in first-seen order.
fn duplicate_identifiers(params: &[NormalizedParameter]) -> Vec<&str> {
    let mut duplicates: Vec<&str> = Vec::new();
    for (i, param) in params.iter().enumerate() {
        let name = param.val_name.as_str();
        if params[..i].iter().any(|p| p.val_name == name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }
    duplicates
}

/// Bucket parameters by position and arrange the call's arguments.
///
/// `curried` names the path parameters already bound by the accessor tree
/// (default form); they are not repeated as arguments. Required arguments
/// always precede optional ones and `$config` comes last.
pub fn group(
    path: &str,
    params: Vec<NormalizedParameter>,
    form: ArgumentForm,
    thresholds: &GroupingThresholds,
    curried: &[String],
) -> ParameterGroups {
    let mut groups = ParameterGroups::default();
    for param in params {
        match param.position {
            ParamPosition::Path => groups.path.push(param),
            ParamPosition::Query => groups.query.push(param),
            ParamPosition::Header => groups.header.push(param),
            ParamPosition::FormData => groups.form_data.push(param),
            ParamPosition::Rest => groups.rest.push(param),
            ParamPosition::Body if groups.body.is_none() => groups.body = Some(param),
            ParamPosition::Body => groups.rest.push(param),
            ParamPosition::Config => groups.config = Some(param),
        }
    }
    groups
        .path
        .sort_by_key(|p| path.find(&format!("{{{}}}", p.name)).unwrap_or(usize::MAX));

    let leading: Vec<NormalizedParameter> = match form {
        ArgumentForm::Underscore => groups.path.clone(),
        ArgumentForm::Default => groups
            .path
            .iter()
            .filter(|p| !curried.contains(&p.val_name))
            .cloned()
            .collect(),
    };
    let body = groups.body.clone();
    let config = groups.config.clone();

    let mut all: Vec<NormalizedParameter> = leading.clone();
    all.extend(groups.query.iter().cloned());
    all.extend(body.clone());
    all.extend(groups.form_data.iter().cloned());
    all.extend(groups.header.iter().cloned());
    all.extend(groups.rest.iter().cloned());
    all.extend(config.clone());
    let singles = || -> Vec<Argument> {
        required_first(all.iter().cloned().map(Argument::Single).collect())
    };

    let singles_with = |bundle: Vec<NormalizedParameter>, trailing: &[NormalizedParameter]| {
        let mut args: Vec<Argument> = leading.iter().cloned().map(Argument::Single).collect();
        args.extend(body.clone().map(Argument::Single));
        if !bundle.is_empty() {
            args.push(Argument::Bundle(bundle));
        }
        args.extend(trailing.iter().cloned().map(Argument::Single));
        args.extend(config.clone().map(Argument::Single));
        // Layout is path, body, bundle, rest, config before the partition;
        // TypeScript rejects a required argument after an optional one, so
        // a required bundle moves ahead of an optional body.
        required_first(args)
    };

    groups.arguments = match form {
        ArgumentForm::Underscore => {
            let unbound = all.len() - leading.len() - usize::from(body.is_some());
            if unbound >= thresholds.underscore_bundle_at {
                let mut bundle = groups.query.clone();
                bundle.extend(groups.form_data.iter().cloned());
                bundle.extend(groups.header.iter().cloned());
                singles_with(bundle, &groups.rest)
            } else {
                singles()
            }
        }
        ArgumentForm::Default => {
            let mut bundle = groups.query.clone();
            bundle.extend(groups.form_data.iter().cloned());
            bundle.extend(groups.header.iter().cloned());
            bundle.extend(groups.rest.iter().cloned());
            if bundle.len() > thresholds.bundle_above {
                singles_with(bundle, &[])
            } else {
                singles()
            }
        }
    };
    groups
}

/// Stable partition: required arguments first.
fn required_first(args: Vec<Argument>) -> Vec<Argument> {
    let (mut required, optional): (Vec<_>, Vec<_>) =
        args.into_iter().partition(Argument::is_required);
    required.extend(optional);
    required
}
