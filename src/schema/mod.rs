//! schema model
//!
//! in-memory view of a graphql schema: scalars, enums, object and input
//! types, unions, and the query/mutation fields exposed as requests.
//! every entity can render itself as a typescript declaration, see
//! [`render`].

pub(crate) mod builder;
pub mod introspection;
pub mod render;

use serde::{Deserialize, Serialize};

/// scalars every schema has, whether or not it declares them
pub const BUILTIN_SCALARS: &[&str] = &["Boolean", "Float", "ID", "Int", "String"];

/// client-language primitive a scalar maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Any,
}

impl Primitive {
    /// primitive for a scalar name; custom scalars map to `any`
    pub fn for_scalar(name: &str) -> Self {
        match name {
            "String" | "ID" => Primitive::String,
            "Int" | "Float" => Primitive::Number,
            "Boolean" => Primitive::Boolean,
            _ => Primitive::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Any => "any",
        }
    }
}

/// scalar type entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
    pub primitive: Primitive,
    #[serde(default)]
    pub description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let name = name.into();
        Self {
            primitive: Primitive::for_scalar(&name),
            name,
            description,
        }
    }

    /// true for the five scalars defined by the graphql spec itself
    pub fn is_builtin(&self) -> bool {
        BUILTIN_SCALARS.contains(&self.name.as_str())
    }
}

/// enum type entry with its values in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// what a field or argument points at, resolved against the registries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FieldType {
    Scalar(String),
    Enum(String),
    Object(String),
    Interface(String),
    Union(String),
    InputObject(String),
    /// named type that no registry knows about
    Unresolved(String),
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Scalar(name)
            | FieldType::Enum(name)
            | FieldType::Object(name)
            | FieldType::Interface(name)
            | FieldType::Union(name)
            | FieldType::InputObject(name)
            | FieldType::Unresolved(name) => name,
        }
    }

    /// object-like types that carry a selection set of their own
    pub fn is_expandable(&self) -> bool {
        matches!(self, FieldType::Object(_) | FieldType::Interface(_))
    }

    pub fn is_scalar_or_enum(&self) -> bool {
        matches!(self, FieldType::Scalar(_) | FieldType::Enum(_))
    }
}

/// one field of an object/input type, or one argument of a request or field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// outermost wrapper is non-null
    pub non_null: bool,
    pub is_scalar: bool,
    /// a list wrapper appears anywhere in the type
    pub is_list: bool,
    /// innermost named type
    pub of_type: String,
    /// full graphql type as written, e.g. `[Int!]!`
    pub type_ref: String,
    pub kind: FieldType,
    #[serde(default)]
    pub description: Option<String>,
    /// argument default as graphql literal text
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub arguments: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    /// required means non-null without a default
    pub fn is_required(&self) -> bool {
        self.non_null && self.default_value.is_none()
    }
}

/// object or interface type entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub is_interface: bool,
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// input object type entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

/// union type entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub members: Vec<String>,
}

/// operation keyword a request is issued under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Query,
    Mutation,
}

impl RequestKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            RequestKind::Query => "query",
            RequestKind::Mutation => "mutation",
        }
    }
}

/// a root query or mutation field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub name: String,
    pub return_type: String,
    pub returns_list: bool,
    pub kind: RequestKind,
    #[serde(default)]
    pub description: Option<String>,
    pub arguments: Vec<FieldDescriptor>,
    /// synthesized input type mirroring the arguments
    pub input_type: String,
}

impl RequestDescriptor {
    pub fn is_query(&self) -> bool {
        self.kind == RequestKind::Query
    }

    pub fn is_mutation(&self) -> bool {
        self.kind == RequestKind::Mutation
    }
}

/// `pokemon` -> `PokemonInputType`
pub fn input_type_name(request: &str) -> String {
    let mut chars = request.chars();
    let mut out = String::new();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.push_str(chars.as_str());
    out.push_str("InputType");
    out
}
