//! schema builder
//!
//! turns a parsed sdl document into model entries. names are collected in a
//! first pass so that field resolution can classify every reference.

use super::{
    input_type_name, EnumType, FieldDescriptor, FieldType, InputType, ObjectType, RequestDescriptor,
    RequestKind, ScalarType, UnionType, BUILTIN_SCALARS,
};
use crate::error::{Error, Result};
use graphql_parser::schema::{self as ast, Definition, Document, Type, TypeDefinition};
use std::collections::{BTreeMap, BTreeSet};

/// everything a single schema load produces
#[derive(Debug, Default)]
pub(crate) struct SchemaParts {
    pub scalars: BTreeMap<String, ScalarType>,
    pub enums: BTreeMap<String, EnumType>,
    pub inputs: BTreeMap<String, InputType>,
    pub objects: BTreeMap<String, ObjectType>,
    pub unions: BTreeMap<String, UnionType>,
    pub requests: Vec<RequestDescriptor>,
}

struct SchemaContext<'d, 'a> {
    types: BTreeMap<String, &'d TypeDefinition<'a, String>>,
    query_type: String,
    mutation_type: Option<String>,
    scalars: BTreeSet<String>,
    enums: BTreeSet<String>,
    inputs: BTreeSet<String>,
    objects: BTreeSet<String>,
    interfaces: BTreeSet<String>,
    unions: BTreeSet<String>,
}

impl<'d, 'a> SchemaContext<'d, 'a> {
    fn new(doc: &'d Document<'a, String>) -> Self {
        let mut types = BTreeMap::new();
        let mut scalars: BTreeSet<String> =
            BUILTIN_SCALARS.iter().map(|name| name.to_string()).collect();
        let mut enums = BTreeSet::new();
        let mut inputs = BTreeSet::new();
        let mut objects = BTreeSet::new();
        let mut interfaces = BTreeSet::new();
        let mut unions = BTreeSet::new();
        let mut query_type = "Query".to_string();
        let mut mutation_type = None;
        let mut explicit_schema = false;

        for def in &doc.definitions {
            match def {
                Definition::TypeDefinition(ty) => {
                    let name = type_name(ty);
                    if is_introspection_type(name) {
                        continue;
                    }
                    let set = match ty {
                        TypeDefinition::Scalar(_) => &mut scalars,
                        TypeDefinition::Enum(_) => &mut enums,
                        TypeDefinition::InputObject(_) => &mut inputs,
                        TypeDefinition::Object(_) => &mut objects,
                        TypeDefinition::Interface(_) => &mut interfaces,
                        TypeDefinition::Union(_) => &mut unions,
                    };
                    set.insert(name.clone());
                    types.insert(name.clone(), ty);
                }
                Definition::SchemaDefinition(schema) => {
                    explicit_schema = true;
                    if let Some(query) = &schema.query {
                        query_type = query.clone();
                    }
                    mutation_type = schema.mutation.clone();
                }
                _ => {}
            }
        }

        if !explicit_schema && objects.contains("Mutation") {
            mutation_type = Some("Mutation".to_string());
        }

        Self {
            types,
            query_type,
            mutation_type,
            scalars,
            enums,
            inputs,
            objects,
            interfaces,
            unions,
        }
    }

    fn classify(&self, name: &str) -> FieldType {
        let name = name.to_string();
        if self.scalars.contains(&name) {
            FieldType::Scalar(name)
        } else if self.enums.contains(&name) {
            FieldType::Enum(name)
        } else if self.objects.contains(&name) {
            FieldType::Object(name)
        } else if self.interfaces.contains(&name) {
            FieldType::Interface(name)
        } else if self.unions.contains(&name) {
            FieldType::Union(name)
        } else if self.inputs.contains(&name) {
            FieldType::InputObject(name)
        } else {
            tracing::debug!(type_name = %name, "unresolved type reference");
            FieldType::Unresolved(name)
        }
    }

    fn field(&self, field: &ast::Field<'a, String>) -> FieldDescriptor {
        let mut descriptor = resolve_field(
            &field.name,
            &field.field_type,
            field.description.clone(),
            None,
            &self.scalars,
        );
        descriptor.kind = self.classify(&descriptor.of_type);
        descriptor.arguments = field.arguments.iter().map(|arg| self.input_value(arg)).collect();
        descriptor
    }

    fn input_value(&self, value: &ast::InputValue<'a, String>) -> FieldDescriptor {
        let mut descriptor = resolve_field(
            &value.name,
            &value.value_type,
            value.description.clone(),
            value.default_value.as_ref().map(|v| v.to_string()),
            &self.scalars,
        );
        descriptor.kind = self.classify(&descriptor.of_type);
        descriptor
    }
}

fn type_name<'d>(ty: &'d TypeDefinition<'_, String>) -> &'d String {
    match ty {
        TypeDefinition::Scalar(t) => &t.name,
        TypeDefinition::Enum(t) => &t.name,
        TypeDefinition::InputObject(t) => &t.name,
        TypeDefinition::Object(t) => &t.name,
        TypeDefinition::Interface(t) => &t.name,
        TypeDefinition::Union(t) => &t.name,
    }
}

fn is_introspection_type(name: &str) -> bool {
    name.starts_with("__")
}

/// build every model entry from a parsed document
pub(crate) fn build(doc: &Document<'_, String>) -> Result<SchemaParts> {
    let ctx = SchemaContext::new(doc);

    if !ctx.objects.contains(&ctx.query_type) {
        return Err(Error::Schema(format!(
            "schema has no query root type `{}`",
            ctx.query_type
        )));
    }

    let mut parts = SchemaParts::default();
    for name in &ctx.scalars {
        let description = match ctx.types.get(name) {
            Some(TypeDefinition::Scalar(scalar)) => scalar.description.clone(),
            _ => None,
        };
        parts
            .scalars
            .insert(name.clone(), ScalarType::new(name.clone(), description));
    }

    for (name, ty) in &ctx.types {
        match ty {
            TypeDefinition::Scalar(_) => {}
            TypeDefinition::Enum(enum_ty) => {
                parts.enums.insert(
                    name.clone(),
                    EnumType {
                        name: name.clone(),
                        values: enum_ty.values.iter().map(|v| v.name.clone()).collect(),
                        description: enum_ty.description.clone(),
                    },
                );
            }
            TypeDefinition::InputObject(input) => {
                parts.inputs.insert(
                    name.clone(),
                    InputType {
                        name: name.clone(),
                        description: input.description.clone(),
                        fields: input.fields.iter().map(|f| ctx.input_value(f)).collect(),
                    },
                );
            }
            TypeDefinition::Object(obj) => {
                parts.objects.insert(
                    name.clone(),
                    ObjectType {
                        name: name.clone(),
                        description: obj.description.clone(),
                        fields: obj.fields.iter().map(|f| ctx.field(f)).collect(),
                        interfaces: obj.implements_interfaces.clone(),
                        is_interface: false,
                    },
                );
            }
            TypeDefinition::Interface(iface) => {
                parts.objects.insert(
                    name.clone(),
                    ObjectType {
                        name: name.clone(),
                        description: iface.description.clone(),
                        fields: iface.fields.iter().map(|f| ctx.field(f)).collect(),
                        interfaces: Vec::new(),
                        is_interface: true,
                    },
                );
            }
            TypeDefinition::Union(union_ty) => {
                parts.unions.insert(
                    name.clone(),
                    UnionType {
                        name: name.clone(),
                        description: union_ty.description.clone(),
                        members: union_ty.types.clone(),
                    },
                );
            }
        }
    }

    let roots = [
        (Some(ctx.query_type.clone()), RequestKind::Query),
        (ctx.mutation_type.clone(), RequestKind::Mutation),
    ];
    for (root, kind) in roots {
        let Some(root) = root else { continue };
        let Some(TypeDefinition::Object(obj)) = ctx.types.get(&root) else {
            if kind == RequestKind::Mutation {
                tracing::warn!(root = %root, "mutation root type is not an object type");
                continue;
            }
            return Err(Error::Schema(format!("query root `{root}` is not an object type")));
        };
        for field in &obj.fields {
            if field.name.starts_with(root.as_str()) {
                continue;
            }
            let descriptor = ctx.field(field);
            let request = RequestDescriptor {
                name: descriptor.name.clone(),
                return_type: descriptor.of_type.clone(),
                returns_list: descriptor.is_list,
                kind,
                description: descriptor.description.clone(),
                input_type: input_type_name(&descriptor.name),
                arguments: descriptor.arguments,
            };
            if parts.inputs.contains_key(&request.input_type) {
                tracing::warn!(
                    input_type = %request.input_type,
                    "synthesized input type collides with a schema type, keeping the schema type"
                );
            } else {
                parts.inputs.insert(
                    request.input_type.clone(),
                    InputType {
                        name: request.input_type.clone(),
                        description: None,
                        fields: request.arguments.clone(),
                    },
                );
            }
            parts.requests.push(request);
        }
    }

    tracing::debug!(
        scalars = parts.scalars.len(),
        enums = parts.enums.len(),
        inputs = parts.inputs.len(),
        objects = parts.objects.len(),
        unions = parts.unions.len(),
        requests = parts.requests.len(),
        "schema built"
    );

    Ok(parts)
}

/// unwrap non-null and list wrappers down to the named type.
///
/// `kind` is left as [`FieldType::Unresolved`]; callers classify it once
/// every type name is known.
pub(crate) fn resolve_field(
    name: &str,
    ty: &Type<'_, String>,
    description: Option<String>,
    default_value: Option<String>,
    scalars: &BTreeSet<String>,
) -> FieldDescriptor {
    let non_null = matches!(ty, Type::NonNullType(_));
    let mut is_list = false;
    let mut current = ty;
    let of_type = loop {
        match current {
            Type::NonNullType(inner) => current = inner,
            Type::ListType(inner) => {
                is_list = true;
                current = inner;
            }
            Type::NamedType(named) => break named.clone(),
        }
    };

    FieldDescriptor {
        name: name.to_string(),
        non_null,
        is_scalar: scalars.contains(&of_type),
        is_list,
        type_ref: format_gql_type(ty),
        kind: FieldType::Unresolved(of_type.clone()),
        of_type,
        description,
        default_value,
        arguments: Vec::new(),
    }
}

pub(crate) fn format_gql_type(ty: &Type<'_, String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::NonNullType(inner) => format!("{}!", format_gql_type(inner)),
        Type::ListType(inner) => format!("[{}]", format_gql_type(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::schema::parse_schema;

    fn build_sdl(sdl: &str) -> Result<SchemaParts> {
        let doc = parse_schema::<String>(sdl).expect("valid sdl");
        build(&doc)
    }

    const SHAPES: &str = r#"
        enum Color { RED GREEN }
        type Pet { name: String }
        type Query {
            int: Int
            intRequired: Int!
            intList: [Int]
            intRequiredList: [Int]!
            intListOfRequired: [Int!]
            intRequiredListOfRequired: [Int!]!
            color: Color
            colorRequired: Color!
            colorList: [Color]
            colorRequiredList: [Color]!
            colorListOfRequired: [Color!]
            colorRequiredListOfRequired: [Color!]!
            pet: Pet
            petRequired: Pet!
            petList: [Pet]
            petRequiredList: [Pet]!
            petListOfRequired: [Pet!]
            petRequiredListOfRequired: [Pet!]!
        }
    "#;

    #[test]
    fn test_field_resolution_wrapper_shapes() {
        let parts = build_sdl(SHAPES).unwrap();
        let query = &parts.objects["Query"];
        let shapes = [
            ("", false, false, "{}"),
            ("Required", true, false, "{}!"),
            ("List", false, true, "[{}]"),
            ("RequiredList", true, true, "[{}]!"),
            ("ListOfRequired", false, true, "[{}!]"),
            ("RequiredListOfRequired", true, true, "[{}!]!"),
        ];
        let named = [
            ("int", "Int", true, FieldType::Scalar("Int".into())),
            ("color", "Color", false, FieldType::Enum("Color".into())),
            ("pet", "Pet", false, FieldType::Object("Pet".into())),
        ];

        for (prefix, of_type, is_scalar, kind) in &named {
            for (suffix, non_null, is_list, wrapper) in shapes {
                let name = format!("{prefix}{suffix}");
                let field = query.field(&name).unwrap();
                assert_eq!(field.non_null, non_null, "{name} non_null");
                assert_eq!(field.is_list, is_list, "{name} is_list");
                assert_eq!(field.is_scalar, *is_scalar, "{name} is_scalar");
                assert_eq!(field.of_type, *of_type, "{name} of_type");
                assert_eq!(field.type_ref, wrapper.replace("{}", of_type), "{name} type_ref");
                assert_eq!(&field.kind, kind, "{name} kind");
            }
        }
    }

    #[test]
    fn test_requests_and_synthesized_inputs() {
        let parts = build_sdl(
            r#"
            type Pokemon { id: Int!, name: String }
            type Query {
                pokemon(id: Int!): Pokemon
                pokemons(first: Int = 10): [Pokemon]
                QueryMeta: String
            }
            type Mutation { rename(id: Int!, name: String!): Pokemon }
        "#,
        )
        .unwrap();

        let names: Vec<_> = parts.requests.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pokemon", "pokemons", "rename"]);
        assert!(parts.requests[0].is_query());
        assert!(parts.requests[2].is_mutation());
        assert!(parts.requests[1].returns_list);
        assert_eq!(parts.requests[1].arguments[0].default_value.as_deref(), Some("10"));
        assert!(!parts.requests[1].arguments[0].is_required());

        let input = &parts.inputs["PokemonInputType"];
        assert_eq!(input.fields.len(), 1);
        assert_eq!(input.fields[0].name, "id");
        assert!(parts.inputs.contains_key("RenameInputType"));
    }

    #[test]
    fn test_explicit_schema_roots() {
        let parts = build_sdl(
            r#"
            schema { query: RootQuery }
            type RootQuery { hello: String }
            type Mutation { ignored: String }
        "#,
        )
        .unwrap();
        assert_eq!(parts.requests.len(), 1);
        assert_eq!(parts.requests[0].name, "hello");
    }

    #[test]
    fn test_missing_query_root() {
        let err = build_sdl("type Pokemon { id: Int }").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_types_sorted_and_classified() {
        let parts = build_sdl(
            r#"
            scalar DateTime
            interface Node { id: ID! }
            union Search = User | Post
            type User implements Node { id: ID!, posts: [Post] }
            type Post implements Node { id: ID!, author: User, at: DateTime, missing: Ghost }
            input PostFilter { author: ID }
            type Query { search(text: String!): [Search], node(id: ID!): Node }
        "#,
        )
        .unwrap();

        let objects: Vec<_> = parts.objects.keys().cloned().collect();
        assert_eq!(objects, vec!["Node", "Post", "Query", "User"]);
        assert!(parts.objects["Node"].is_interface);
        assert_eq!(parts.objects["User"].interfaces, vec!["Node".to_string()]);
        assert_eq!(parts.unions["Search"].members.len(), 2);
        assert!(parts.scalars.contains_key("DateTime"));
        assert!(parts.scalars.contains_key("Boolean"));

        let post = &parts.objects["Post"];
        assert_eq!(post.field("at").unwrap().kind, FieldType::Scalar("DateTime".into()));
        assert!(post.field("at").unwrap().is_scalar);
        assert_eq!(post.field("missing").unwrap().kind, FieldType::Unresolved("Ghost".into()));
        assert_eq!(
            parts.requests[1].arguments[0].kind,
            FieldType::Scalar("ID".into())
        );
    }

    #[test]
    fn test_field_arguments_carried() {
        let parts = build_sdl(
            r#"
            type User { friends(first: Int!, after: String): [User] }
            type Query { me: User }
        "#,
        )
        .unwrap();
        let friends = parts.objects["User"].field("friends").unwrap();
        assert_eq!(friends.arguments.len(), 2);
        assert!(friends.arguments[0].non_null);
        assert_eq!(friends.arguments[1].type_ref, "String");
    }
}
