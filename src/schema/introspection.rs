//! introspection results
//!
//! serde types for the standard introspection query response and a printer
//! that turns them into sdl, so both schema sources go through the same
//! parser and builder.

use crate::error::{Error, Result};
use serde::Deserialize;

/// the introspection query sent by [`crate::Client::introspect`]
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) { name description }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
"#;

/// accepts both `{"data": {"__schema": ..}}` and a bare `{"__schema": ..}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntrospectionResponse {
    Full { data: IntrospectionData },
    Bare(IntrospectionData),
}

impl IntrospectionResponse {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| {
            Error::Schema(format!("introspection result has no usable __schema: {err}"))
        })
    }

    pub fn schema(&self) -> &IntrospectionSchema {
        match self {
            IntrospectionResponse::Full { data } | IntrospectionResponse::Bare(data) => {
                &data.schema
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<NamedRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedRef>,
    pub types: Vec<FullType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// graphql type text, e.g. `[Int!]!`
    pub fn render(&self) -> Result<String> {
        match self.kind {
            TypeKind::NonNull => Ok(format!("{}!", self.inner()?.render()?)),
            TypeKind::List => Ok(format!("[{}]", self.inner()?.render()?)),
            _ => self
                .name
                .clone()
                .ok_or_else(|| Error::Schema(format!("{:?} type reference without a name", self.kind))),
        }
    }

    fn inner(&self) -> Result<&TypeRef> {
        self.of_type
            .as_deref()
            .ok_or_else(|| Error::Schema(format!("{:?} wrapper without ofType", self.kind)))
    }
}

/// print the introspected schema as sdl
pub fn to_sdl(schema: &IntrospectionSchema) -> Result<String> {
    let query = schema
        .query_type
        .as_ref()
        .ok_or_else(|| Error::Schema("introspection result has no queryType".to_string()))?;
    if schema.types.is_empty() {
        return Err(Error::Schema(
            "introspection result has an empty type map".to_string(),
        ));
    }

    let mut out = String::from("schema {\n");
    out.push_str(&format!("  query: {}\n", query.name));
    if let Some(mutation) = &schema.mutation_type {
        out.push_str(&format!("  mutation: {}\n", mutation.name));
    }
    if let Some(subscription) = &schema.subscription_type {
        out.push_str(&format!("  subscription: {}\n", subscription.name));
    }
    out.push_str("}\n\n");

    for ty in &schema.types {
        let Some(name) = &ty.name else { continue };
        if name.starts_with("__") || super::BUILTIN_SCALARS.contains(&name.as_str()) {
            continue;
        }
        out.push_str(&description(ty.description.as_deref(), ""));
        match ty.kind {
            TypeKind::Scalar => out.push_str(&format!("scalar {name}\n\n")),
            TypeKind::Object | TypeKind::Interface => {
                let keyword = if ty.kind == TypeKind::Object {
                    "type"
                } else {
                    "interface"
                };
                out.push_str(&format!("{keyword} {name}"));
                let interfaces = named_list(ty.interfaces.as_deref());
                if !interfaces.is_empty() {
                    out.push_str(&format!(" implements {}", interfaces.join(" & ")));
                }
                let fields = ty.fields.as_deref().unwrap_or_default();
                if fields.is_empty() {
                    out.push_str("\n\n");
                    continue;
                }
                out.push_str(" {\n");
                for field in fields {
                    out.push_str(&description(field.description.as_deref(), "  "));
                    out.push_str(&format!("  {}", field.name));
                    if !field.args.is_empty() {
                        let args = field
                            .args
                            .iter()
                            .map(input_value)
                            .collect::<Result<Vec<_>>>()?;
                        out.push_str(&format!("({})", args.join(", ")));
                    }
                    out.push_str(&format!(": {}\n", field.type_ref.render()?));
                }
                out.push_str("}\n\n");
            }
            TypeKind::Union => {
                let members = named_list(ty.possible_types.as_deref());
                out.push_str(&format!("union {name} = {}\n\n", members.join(" | ")));
            }
            TypeKind::Enum => {
                out.push_str(&format!("enum {name} {{\n"));
                for value in ty.enum_values.as_deref().unwrap_or_default() {
                    out.push_str(&description(value.description.as_deref(), "  "));
                    out.push_str(&format!("  {}\n", value.name));
                }
                out.push_str("}\n\n");
            }
            TypeKind::InputObject => {
                out.push_str(&format!("input {name} {{\n"));
                for value in ty.input_fields.as_deref().unwrap_or_default() {
                    out.push_str(&format!("  {}\n", input_value(value)?));
                }
                out.push_str("}\n\n");
            }
            TypeKind::List | TypeKind::NonNull => {
                return Err(Error::Schema(format!(
                    "wrapper kind {:?} in the type map for `{name}`",
                    ty.kind
                )));
            }
        }
    }

    Ok(out)
}

fn input_value(value: &IntrospectionInputValue) -> Result<String> {
    let mut out = String::new();
    if let Some(desc) = value.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&quote(desc));
        out.push(' ');
    }
    out.push_str(&format!("{}: {}", value.name, value.type_ref.render()?));
    if let Some(default) = &value.default_value {
        out.push_str(&format!(" = {default}"));
    }
    Ok(out)
}

fn named_list(refs: Option<&[TypeRef]>) -> Vec<String> {
    refs.unwrap_or_default()
        .iter()
        .filter_map(|r| r.name.clone())
        .collect()
}

fn description(desc: Option<&str>, indent: &str) -> String {
    match desc.filter(|d| !d.is_empty()) {
        Some(desc) => format!("{indent}{}\n", quote(desc)),
        None => String::new(),
    }
}

// json string escapes are a subset of graphql string escapes
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    fn named(kind: &str, name: &str) -> serde_json::Value {
        json!({"kind": kind, "name": name, "ofType": null})
    }

    fn non_null(inner: serde_json::Value) -> serde_json::Value {
        json!({"kind": "NON_NULL", "name": null, "ofType": inner})
    }

    fn list(inner: serde_json::Value) -> serde_json::Value {
        json!({"kind": "LIST", "name": null, "ofType": inner})
    }

    pub(crate) fn pokedex_introspection() -> serde_json::Value {
        json!({
            "data": {
                "__schema": {
                    "queryType": {"name": "Query"},
                    "mutationType": null,
                    "subscriptionType": null,
                    "types": [
                        {"kind": "SCALAR", "name": "Int", "description": "builtin"},
                        {"kind": "SCALAR", "name": "String"},
                        {
                            "kind": "OBJECT", "name": "Query",
                            "fields": [{
                                "name": "pokemon",
                                "description": "look one up",
                                "args": [{"name": "id", "type": non_null(named("SCALAR", "Int")), "defaultValue": null}],
                                "type": named("OBJECT", "Pokemon")
                            }],
                            "interfaces": []
                        },
                        {
                            "kind": "OBJECT", "name": "Pokemon", "description": "a \"pocket\" monster",
                            "fields": [
                                {"name": "id", "args": [], "type": non_null(named("SCALAR", "Int"))},
                                {"name": "name", "args": [], "type": named("SCALAR", "String")},
                                {"name": "types", "args": [], "type": non_null(list(non_null(named("ENUM", "Element"))))}
                            ],
                            "interfaces": []
                        },
                        {
                            "kind": "ENUM", "name": "Element",
                            "enumValues": [{"name": "FIRE"}, {"name": "WATER"}]
                        },
                        {
                            "kind": "INPUT_OBJECT", "name": "PokemonFilter",
                            "inputFields": [{"name": "first", "type": named("SCALAR", "Int"), "defaultValue": "10"}]
                        },
                        {"kind": "OBJECT", "name": "__Schema", "fields": []}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_to_sdl_parses() {
        let response = IntrospectionResponse::from_value(pokedex_introspection()).unwrap();
        let sdl = to_sdl(response.schema()).unwrap();

        assert!(sdl.contains("query: Query"));
        assert!(sdl.contains("pokemon(id: Int!): Pokemon"));
        assert!(sdl.contains("types: [Element!]!"));
        assert!(sdl.contains("first: Int = 10"));
        assert!(sdl.contains("\"a \\\"pocket\\\" monster\""));
        assert!(!sdl.contains("__Schema"));
        assert!(!sdl.contains("scalar Int"));

        graphql_parser::schema::parse_schema::<String>(&sdl).expect("printed sdl parses");
    }

    #[test]
    fn test_bare_schema_accepted() {
        let value = pokedex_introspection()["data"].clone();
        let response = IntrospectionResponse::from_value(value).unwrap();
        assert!(matches!(response, IntrospectionResponse::Bare(_)));
        assert_eq!(response.schema().types.len(), 7);
    }

    #[test]
    fn test_missing_schema_rejected() {
        let err = IntrospectionResponse::from_value(json!({"data": {"other": 1}})).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_empty_type_map_rejected() {
        let response = IntrospectionResponse::from_value(json!({
            "__schema": {"queryType": {"name": "Query"}, "types": []}
        }))
        .unwrap();
        assert!(matches!(to_sdl(response.schema()), Err(Error::Schema(_))));
    }

    #[test]
    fn test_type_ref_render() {
        let ty: TypeRef =
            serde_json::from_value(non_null(list(non_null(named("SCALAR", "Int"))))).unwrap();
        assert_eq!(ty.render().unwrap(), "[Int!]!");

        let broken: TypeRef = serde_json::from_value(json!({"kind": "LIST"})).unwrap();
        assert!(broken.render().is_err());
    }
}
