use indexmap::IndexMap;

use super::schema::Schema;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Lowercase verb, as used for axios helpers and tree keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Verbs whose axios helper takes the payload as a positional argument.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Swagger 2.0 `in: body`.
    Body,
    /// Swagger 2.0 `in: formData`.
    FormData,
    Other,
}

impl ParameterLocation {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "path" => Self::Path,
            "query" => Self::Query,
            "header" => Self::Header,
            "cookie" => Self::Cookie,
            "body" => Self::Body,
            "formData" => Self::FormData,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
            Self::Other => "other",
        }
    }
}

/// A declared parameter with its references resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Wire name. Empty when the document omitted it.
    pub name: String,
    pub location: ParameterLocation,
    pub required: Option<bool>,
    pub description: Option<String>,
    pub schema: Schema,
}

/// An OpenAPI 3.x request body, reduced to the media type that is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub schema: Schema,
    pub required: Option<bool>,
    pub description: Option<String>,
    /// The chosen media type is `multipart/form-data`.
    pub multipart: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

/// One operation under one path.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub path: String,
    pub method: HttpMethod,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Keyed by status code (`"200"`, `"404"`, `"default"`).
    pub responses: IndexMap<String, Response>,
    pub deprecated: bool,
}

impl Operation {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            summary: None,
            description: None,
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            deprecated: false,
        }
    }

    /// Schema of the `200` response, which types the call's promise.
    pub fn success_schema(&self) -> Option<&Schema> {
        self.responses.get("200").and_then(|r| r.schema.as_ref())
    }

    /// Whether any payload is sent as `multipart/form-data`.
    pub fn is_multipart(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.location == ParameterLocation::FormData && !p.name.is_empty())
            || self.request_body.as_ref().is_some_and(|b| b.multipart)
    }
}
