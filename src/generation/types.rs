//! Core types for the generation domain

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Prefix of every reference into `components.schemas`
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// HTTP methods that may key an operation inside a path item
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Primitive JSON Schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
        }
    }

    /// Map an example value to its schema type. Whole numbers are integers even
    /// when written with a fractional part (`1.0`).
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Bool(_) => ScalarType::Boolean,
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => ScalarType::Integer,
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => ScalarType::Integer,
                _ => ScalarType::Number,
            },
            _ => ScalarType::String,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred schema node
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// `type: object`; properties are omitted from the output when empty
    Object { properties: IndexMap<String, Schema> },
    /// `type: array`
    Array { items: Box<Schema> },
    /// Reference to a named schema in `components.schemas`
    Ref(String),
    /// Primitive with an optional example
    Scalar {
        kind: ScalarType,
        example: Option<JsonValue>,
        nullable: bool,
    },
}

impl Schema {
    pub fn empty_object() -> Self {
        Schema::Object {
            properties: IndexMap::new(),
        }
    }

    pub fn string() -> Self {
        Schema::Scalar {
            kind: ScalarType::String,
            example: None,
            nullable: false,
        }
    }

    /// Placeholder for `null`: nothing better than a nullable string can be inferred
    pub fn nullable_string() -> Self {
        Schema::Scalar {
            kind: ScalarType::String,
            example: None,
            nullable: true,
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Schema::Ref(name.into())
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Schema::Object { properties } => {
                map.serialize_entry("type", "object")?;
                if !properties.is_empty() {
                    map.serialize_entry("properties", properties)?;
                }
            }
            Schema::Array { items } => {
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
            }
            Schema::Ref(name) => {
                map.serialize_entry("$ref", &format!("{SCHEMA_REF_PREFIX}{name}"))?;
            }
            Schema::Scalar {
                kind,
                example,
                nullable,
            } => {
                map.serialize_entry("type", kind)?;
                if let Some(example) = example {
                    map.serialize_entry("example", example)?;
                }
                if *nullable {
                    map.serialize_entry("nullable", &true)?;
                }
            }
        }
        map.end()
    }
}

/// Flat registry of named schemas shared across one generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `name` and return the name it ended up with.
    ///
    /// Re-registering an identical schema reuses the existing entry. A different
    /// schema under a taken name gets a numeric suffix, so a name never maps to
    /// two schemas.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) -> String {
        let name = name.into();
        let mut candidate = name.clone();
        let mut suffix = 2;
        loop {
            match self.schemas.get(&candidate) {
                None => {
                    self.schemas.insert(candidate.clone(), schema);
                    return candidate;
                }
                Some(existing) if *existing == schema => return candidate,
                Some(_) => {
                    debug!(name = %name, candidate = %candidate, "Schema name taken, trying next");
                    candidate = format!("{name}{suffix}");
                    suffix += 1;
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// Operation parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
}

/// Content entry of a request body or response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

/// A single generated operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
}

/// Options controlling how a captured request is documented
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenApiOptions {
    /// Explicit operationId; derived from method and path when absent
    pub operation_name: Option<String>,
    /// Path template with `{param}` or `:param` placeholders
    pub url_template: Option<String>,
    pub tags: Vec<String>,
    /// Where the serialized document is written
    pub output_path: Option<PathBuf>,
    /// Existing document to merge into
    pub append_path: Option<PathBuf>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            version: "1.0.0".to_string(),
            extra: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schemas: IndexMap<String, JsonValue>,
    #[serde(flatten)]
    pub other: IndexMap<String, JsonValue>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.other.is_empty()
    }
}

/// Path item: HTTP method (or any other path-level key) to its JSON object
pub type PathItem = IndexMap<String, JsonValue>;

/// OpenAPI 3.0 document.
///
/// Operations are held as JSON values so documents loaded from disk keep every
/// field they carry when merged and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_openapi_version")]
    pub openapi: String,
    #[serde(default)]
    pub info: Info,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    #[serde(flatten)]
    pub extensions: IndexMap<String, JsonValue>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            openapi: default_openapi_version(),
            info: Info::default(),
            paths: IndexMap::new(),
            components: Components::default(),
            extensions: IndexMap::new(),
        }
    }
}

impl Document {
    /// Every `(path, method, operationId)` in the document, in document order
    pub fn operation_ids(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.iter()
                .filter(|(method, _)| HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()))
                .filter_map(move |(method, operation)| {
                    operation
                        .get("operationId")
                        .and_then(JsonValue::as_str)
                        .map(|id| (path.as_str(), method.as_str(), id))
                })
        })
    }
}

fn default_openapi_version() -> String {
    "3.0.0".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
