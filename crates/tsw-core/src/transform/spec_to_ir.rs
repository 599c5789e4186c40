use indexmap::IndexMap;

use crate::ir::*;
use crate::parse::operation::{
    MediaType, Operation as RawOperation, PathItem, RequestBody as RawRequestBody,
    RequestBodyOrRef, Response as RawResponse, ResponseOrRef,
};
use crate::parse::parameter::{Parameter as RawParameter, ParameterOrRef};
use crate::parse::schema::SchemaOrBool;
use crate::parse::spec::{Info, OpenApiSpec, RawSpec, SwaggerSpec};

use super::name_sanitizer::sanitize_name;
use super::schema_converter::{convert_raw_schema, convert_schema};

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";
const WILDCARD: &str = "*/*";

/// Reusable definitions that operations may point at with `$ref`.
struct Components<'a> {
    parameters: &'a IndexMap<String, RawParameter>,
    parameter_prefix: &'static str,
    responses: &'a IndexMap<String, RawResponse>,
    response_prefix: &'static str,
    request_bodies: Option<&'a IndexMap<String, RawRequestBody>>,
}

impl<'a> Components<'a> {
    fn parameter(&self, ref_path: &str) -> Option<&'a RawParameter> {
        let found = ref_path
            .strip_prefix(self.parameter_prefix)
            .and_then(|name| self.parameters.get(name));
        if found.is_none() {
            log::debug!("skipping unresolved parameter reference {ref_path}");
        }
        found
    }

    fn response(&self, ref_path: &str) -> Option<&'a RawResponse> {
        let found = ref_path
            .strip_prefix(self.response_prefix)
            .and_then(|name| self.responses.get(name));
        if found.is_none() {
            log::debug!("skipping unresolved response reference {ref_path}");
        }
        found
    }

    fn request_body(&self, ref_path: &str) -> Option<&'a RawRequestBody> {
        let found = ref_path
            .strip_prefix("#/components/requestBodies/")
            .and_then(|name| self.request_bodies?.get(name));
        if found.is_none() {
            log::debug!("skipping unresolved request body reference {ref_path}");
        }
        found
    }
}

/// Transform a parsed document of either dialect into an [`ApiDocument`].
///
/// Schema keys and every schema `$ref` go through the name sanitizer, so
/// references and table keys always agree. Malformed pieces degrade
/// instead of failing.
pub fn transform(spec: &RawSpec) -> ApiDocument {
    match spec {
        RawSpec::Swagger2(spec) => transform_swagger(spec),
        RawSpec::OpenApi3(spec) => transform_openapi(spec),
    }
}

fn transform_swagger(spec: &SwaggerSpec) -> ApiDocument {
    let components = Components {
        parameters: &spec.parameters,
        parameter_prefix: "#/parameters/",
        responses: &spec.responses,
        response_prefix: "#/responses/",
        request_bodies: None,
    };
    ApiDocument {
        version: SpecVersion::Swagger2,
        info: convert_info(&spec.info),
        schemas: build_schema_table(&spec.definitions),
        operations: resolve_operations(&spec.paths, &components),
    }
}

fn transform_openapi(spec: &OpenApiSpec) -> ApiDocument {
    let components = Components {
        parameters: &spec.components.parameters,
        parameter_prefix: "#/components/parameters/",
        responses: &spec.components.responses,
        response_prefix: "#/components/responses/",
        request_bodies: Some(&spec.components.request_bodies),
    };
    ApiDocument {
        version: SpecVersion::OpenApi3,
        info: convert_info(&spec.info),
        schemas: build_schema_table(&spec.components.schemas),
        operations: resolve_operations(&spec.paths, &components),
    }
}

fn convert_info(info: &Info) -> ApiInfo {
    ApiInfo {
        title: info.title.clone(),
        version: info.version.clone(),
        description: info.description.clone(),
    }
}

fn build_schema_table(raw: &IndexMap<String, SchemaOrBool>) -> SchemaTable {
    let mut table = SchemaTable::new();
    for (key, schema) in raw {
        let name = sanitize_name(key);
        if name.is_empty() {
            log::warn!("schema `{key}` has no usable name, skipping");
            continue;
        }
        if table.insert(name.clone(), convert_schema(schema)).is_some() {
            log::warn!("schema `{key}` collides with another schema named `{name}`, keeping the later one");
        }
    }
    table
}

fn resolve_operations(
    paths: &IndexMap<String, PathItem>,
    components: &Components<'_>,
) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (path, item) in paths {
        let shared = resolve_parameters(&item.parameters, components);
        collect_operations(path, item, &shared, components, &mut operations);
    }
    operations
}

fn collect_operations(
    path: &str,
    item: &PathItem,
    shared: &[Parameter],
    components: &Components<'_>,
    out: &mut Vec<Operation>,
) {
    macro_rules! add_op {
        ($method:expr, $op:expr) => {
            if let Some(ref op) = $op {
                out.push(build_operation($method, path, op, shared, components));
            }
        };
    }

    add_op!(HttpMethod::Get, item.get);
    add_op!(HttpMethod::Post, item.post);
    add_op!(HttpMethod::Put, item.put);
    add_op!(HttpMethod::Patch, item.patch);
    add_op!(HttpMethod::Delete, item.delete);
    add_op!(HttpMethod::Head, item.head);
    add_op!(HttpMethod::Options, item.options);
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    op: &RawOperation,
    shared: &[Parameter],
    components: &Components<'_>,
) -> Operation {
    let own = resolve_parameters(&op.parameters, components);

    // Operation-level parameters override path-level ones with the same name and location.
    let mut parameters: Vec<Parameter> = shared
        .iter()
        .filter(|p| {
            !own.iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    parameters.extend(own);

    let request_body = op.request_body.as_ref().and_then(|body| {
        let raw = match body {
            RequestBodyOrRef::Ref { ref_path } => components.request_body(ref_path)?,
            RequestBodyOrRef::RequestBody(body) => body,
        };
        convert_request_body(raw)
    });

    let responses = op
        .responses
        .iter()
        .filter_map(|(status, response)| {
            let raw = match response {
                ResponseOrRef::Ref { ref_path } => components.response(ref_path)?,
                ResponseOrRef::Response(response) => response,
            };
            Some((status.clone(), convert_response(raw)))
        })
        .collect();

    Operation {
        path: path.to_string(),
        method,
        summary: op.summary.clone(),
        description: op.description.clone(),
        parameters,
        request_body,
        responses,
        deprecated: op.deprecated,
    }
}

fn resolve_parameters(params: &[ParameterOrRef], components: &Components<'_>) -> Vec<Parameter> {
    params
        .iter()
        .filter_map(|param| match param {
            ParameterOrRef::Ref { ref_path } => components.parameter(ref_path),
            ParameterOrRef::Parameter(param) => Some(&**param),
        })
        .map(convert_parameter)
        .collect()
}

fn convert_parameter(raw: &RawParameter) -> Parameter {
    let schema = match &raw.schema {
        Some(schema) => convert_schema(schema),
        None => convert_raw_schema(&raw.inline),
    };
    Parameter {
        name: raw.name.clone().unwrap_or_default(),
        location: raw
            .location
            .as_deref()
            .map(ParameterLocation::from_keyword)
            .unwrap_or(ParameterLocation::Other),
        required: raw.required,
        description: raw.description.clone(),
        schema,
    }
}

fn convert_request_body(raw: &RawRequestBody) -> Option<RequestBody> {
    let (media, multipart) = match (raw.content.get(JSON), raw.content.get(MULTIPART)) {
        (Some(json), _) => (json, false),
        (None, Some(form)) => (form, true),
        (None, None) => return None,
    };
    let schema = media.schema.as_ref()?;
    Some(RequestBody {
        schema: convert_schema(schema),
        required: raw.required,
        description: raw.description.clone(),
        multipart,
    })
}

fn convert_response(raw: &RawResponse) -> Response {
    let schema = raw
        .schema
        .as_ref()
        .or_else(|| response_media(&raw.content))
        .map(convert_schema);
    Response {
        description: raw.description.clone(),
        schema,
    }
}

fn response_media(content: &IndexMap<String, MediaType>) -> Option<&SchemaOrBool> {
    let preferred = [JSON, WILDCARD]
        .iter()
        .find_map(|key| content.get(*key).and_then(|m| m.schema.as_ref()));
    preferred.or_else(|| content.values().find_map(|m| m.schema.as_ref()))
}
