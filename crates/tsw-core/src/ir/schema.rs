use indexmap::IndexMap;

/// A schema in canonical form, one variant per shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub kind: SchemaKind,
    pub meta: SchemaMeta,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            meta: SchemaMeta::default(),
        }
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Ref(name.into()))
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::new(SchemaKind::Primitive {
            primitive,
            format: None,
        })
    }

    pub fn with_meta(mut self, meta: SchemaMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Documentation and nullability carried alongside any shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<serde_json::Value>,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaKind {
    /// Reference to a named schema, already sanitized.
    Ref(String),
    Enum(Vec<serde_json::Value>),
    Array(Box<Schema>),
    Object(ObjectSchema),
    Composition {
        mode: CompositionMode,
        parts: Vec<Schema>,
    },
    Primitive {
        primitive: PrimitiveType,
        format: Option<String>,
    },
    File,
    /// No usable shape information.
    #[default]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    AllOf,
    OneOf,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
    pub additional_properties: Option<Box<Schema>>,
}

impl ObjectSchema {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Scalar type keywords. `integer` is kept apart from `number` because the
/// definitions module exports it as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

/// Named schemas keyed by sanitized name, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaTable {
    entries: IndexMap<String, Schema>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a schema, returning the one it replaced.
    pub fn insert(&mut self, name: String, schema: Schema) -> Option<Schema> {
        self.entries.insert(name, schema)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Schema)> for SchemaTable {
    fn from_iter<I: IntoIterator<Item = (String, Schema)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
