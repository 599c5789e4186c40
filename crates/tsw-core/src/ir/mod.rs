pub mod operation;
pub mod schema;

pub use operation::*;
pub use schema::*;

/// Which dialect a document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
}

impl SpecVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => "swagger 2.0",
            SpecVersion::OpenApi3 => "openapi 3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// A document in canonical form. Each generation run builds its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    pub version: SpecVersion,
    pub info: ApiInfo,
    pub schemas: SchemaTable,
    pub operations: Vec<Operation>,
}
