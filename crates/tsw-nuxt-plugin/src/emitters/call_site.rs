use tsw_core::ir::Operation;
use tsw_core::transform::name_sanitizer::value_identifier;

use crate::doc::operation_doc;
use crate::params::{NormalizedParameter, ParameterGroups, render_arguments};
use crate::type_resolver::TypeResolver;

const MULTIPART_HELPER: &str = "$multipart";

/// One emitted call: an arrow function forwarding to the axios helper for
/// the operation's verb, with its documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub doc: Option<String>,
    pub code: String,
}

/// Emit the call site for `op` from its grouped parameters.
///
/// ```text
/// (active?: boolean, $config?: AxiosRequestConfig): Promise<User> =>
///     $axios.$get(`/v1/users/${id}`, { params: { active }, ...$config })
/// ```
pub fn emit_call_site(op: &Operation, groups: &ParameterGroups, resolver: &TypeResolver<'_>) -> CallSite {
    let body = payload(groups);
    let mut axios_args = vec![url_template(&op.path)];
    let carries_body = op.method.carries_body();
    if carries_body {
        axios_args.push(body.clone().unwrap_or_else(|| "undefined".to_string()));
    }

    let mut options = Vec::new();
    if !groups.header.is_empty() {
        options.push(format!("headers: {{ {} }}", wire_entries(&groups.header)));
    }
    if !groups.query.is_empty() {
        options.push(format!("params: {{ {} }}", wire_entries(&groups.query)));
    }
    if let Some(data) = body.filter(|_| !carries_body) {
        options.push(format!("data: {data}"));
    }
    match &groups.config {
        Some(config) if !options.is_empty() => {
            options.push(format!("...{}", config.val_name));
            axios_args.push(format!("{{ {} }}", options.join(", ")));
        }
        None if !options.is_empty() => axios_args.push(format!("{{ {} }}", options.join(", "))),
        Some(config) => axios_args.push(config.val_name.clone()),
        None => {}
    }

    let return_type = op
        .success_schema()
        .map(|schema| resolver.expr(schema))
        .unwrap_or_else(|| "any".to_string());

    CallSite {
        doc: operation_doc(op, &groups.arguments),
        code: format!(
            "({}): Promise<{return_type}> => $axios.${}({})",
            render_arguments(&groups.arguments),
            op.method.as_str(),
            axios_args.join(", ")
        ),
    }
}

/// The request payload: form fields through the multipart helper, or the
/// body parameter.
fn payload(groups: &ParameterGroups) -> Option<String> {
    if !groups.form_data.is_empty() {
        let names: Vec<&str> = groups.form_data.iter().map(|p| p.val_name.as_str()).collect();
        return Some(format!("{MULTIPART_HELPER}({{ {} }})", names.join(", ")));
    }
    groups.body.as_ref().map(|body| {
        if body.multipart {
            format!("{MULTIPART_HELPER}({})", body.val_name)
        } else {
            body.val_name.clone()
        }
    })
}

fn wire_entries(params: &[NormalizedParameter]) -> String {
    params
        .iter()
        .map(NormalizedParameter::wire_entry)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The URL as a template literal, `{name}` interpolating the parameter's
/// identifier.
pub fn url_template(path: &str) -> String {
    let mut url = String::from("`");
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        url.push_str(&escape_template(&rest[..open]));
        url.push_str(&format!("${{{}}}", value_identifier(&rest[open + 1..close])));
        rest = &rest[close + 1..];
    }
    url.push_str(&escape_template(rest));
    url.push('`');
    url
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use tsw_core::config::{ArgumentForm, GroupingThresholds};
    use tsw_core::ir::{
        HttpMethod, Parameter, ParameterLocation, PrimitiveType, RequestBody, Response, Schema,
        SchemaTable,
    };

    use super::*;
    use crate::params::{classify, group};

    fn table() -> SchemaTable {
        [("User".to_string(), Schema::any())].into_iter().collect()
    }

    fn parameter(name: &str, location: ParameterLocation, primitive: PrimitiveType) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            required: None,
            description: None,
            schema: Schema::primitive(primitive),
        }
    }

    fn emit(op: &Operation, form: ArgumentForm, curried: &[String]) -> CallSite {
        let table = table();
        let resolver = TypeResolver::new(&table);
        let params = classify(op, &resolver, false);
        let groups = group(&op.path, params, form, &GroupingThresholds::default(), curried);
        emit_call_site(op, &groups, &resolver)
    }

    #[test]
    fn test_url_template() {
        assert_eq!(url_template("/v1/users/{id}"), "`/v1/users/${id}`");
        assert_eq!(url_template("/a/{user_id}/b"), "`/a/${userId}/b`");
        assert_eq!(url_template("/plain"), "`/plain`");
    }

    #[test]
    fn test_get_with_curried_path_and_query() {
        let mut op = Operation::new("/v1/users/{id}", HttpMethod::Get);
        op.parameters = vec![
            parameter("id", ParameterLocation::Path, PrimitiveType::Integer),
            parameter("active", ParameterLocation::Query, PrimitiveType::Boolean),
        ];
        op.responses.insert(
            "200".into(),
            Response {
                description: Some("OK".into()),
                schema: Some(Schema::reference("User")),
            },
        );
        let call = emit(&op, ArgumentForm::Default, &["id".to_string()]);
        assert_eq!(
            call.code,
            "(active?: boolean, $config?: AxiosRequestConfig): Promise<User> => $axios.$get(`/v1/users/${id}`, { params: { active }, ...$config })"
        );
        assert_eq!(call.doc, None);
    }

    #[test]
    fn test_underscore_form_keeps_path_argument() {
        let mut op = Operation::new("/v1/users/{id}", HttpMethod::Delete);
        op.parameters = vec![parameter("id", ParameterLocation::Path, PrimitiveType::Integer)];
        let call = emit(&op, ArgumentForm::Underscore, &[]);
        assert_eq!(
            call.code,
            "(id: integer, $config?: AxiosRequestConfig): Promise<any> => $axios.$delete(`/v1/users/${id}`, $config)"
        );
    }

    #[test]
    fn test_post_sends_body_positionally() {
        let mut op = Operation::new("/users", HttpMethod::Post);
        op.request_body = Some(RequestBody {
            schema: Schema::reference("User"),
            required: None,
            description: None,
            multipart: false,
        });
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "($body: User, $config?: AxiosRequestConfig): Promise<any> => $axios.$post(`/users`, $body, $config)"
        );
    }

    #[test]
    fn test_post_without_body_sends_undefined() {
        let op = Operation::new("/ping", HttpMethod::Post);
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "($config?: AxiosRequestConfig): Promise<any> => $axios.$post(`/ping`, undefined, $config)"
        );
    }

    #[test]
    fn test_delete_sends_body_as_data() {
        let mut op = Operation::new("/items", HttpMethod::Delete);
        op.parameters = vec![Parameter {
            name: "ids".into(),
            location: ParameterLocation::Body,
            required: None,
            description: None,
            schema: Schema::primitive(PrimitiveType::String),
        }];
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "($body: string, $config?: AxiosRequestConfig): Promise<any> => $axios.$delete(`/items`, { data: $body, ...$config })"
        );
    }

    #[test]
    fn test_form_data_goes_through_multipart_helper() {
        let mut op = Operation::new("/files", HttpMethod::Post);
        op.parameters = vec![
            Parameter {
                name: "file".into(),
                location: ParameterLocation::FormData,
                required: Some(true),
                description: None,
                schema: Schema::new(tsw_core::ir::SchemaKind::File),
            },
            parameter("note", ParameterLocation::FormData, PrimitiveType::String),
        ];
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "(file: File, note?: string, $config?: AxiosRequestConfig): Promise<any> => $axios.$post(`/files`, $multipart({ file, note }), $config)"
        );
    }

    #[test]
    fn test_multipart_request_body() {
        let mut op = Operation::new("/upload", HttpMethod::Put);
        op.request_body = Some(RequestBody {
            schema: Schema::any(),
            required: Some(false),
            description: Some("Upload form".into()),
            multipart: true,
        });
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "($body?: any, $config?: AxiosRequestConfig): Promise<any> => $axios.$put(`/upload`, $multipart($body), $config)"
        );
        assert_eq!(call.doc.as_deref(), Some("@param $body  Upload form"));
    }

    #[test]
    fn test_headers_use_wire_names() {
        let mut op = Operation::new("/me", HttpMethod::Get);
        op.parameters = vec![parameter("X-Token", ParameterLocation::Header, PrimitiveType::String)];
        let call = emit(&op, ArgumentForm::Default, &[]);
        assert_eq!(
            call.code,
            "(XToken?: string, $config?: AxiosRequestConfig): Promise<any> => $axios.$get(`/me`, { headers: { 'X-Token': XToken }, ...$config })"
        );
    }
}
