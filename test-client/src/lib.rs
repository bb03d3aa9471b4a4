//! pokedex client built on graphql-explorer
//!
//! the schema ships with the crate; operations are built from request tree
//! selections instead of hand-written query strings.

use graphql_explorer::{
    Client, GraphQlResponse, Result, SavedRequest, SchemaRegistry, DEFAULT_MAX_DEPTH,
};
use serde::Deserialize;

pub const SCHEMA: &str = r#"
enum Element { FIRE WATER GRASS ELECTRIC }

type Pokemon {
    id: Int!
    name: String!
    element: Element
    evolutions: [Pokemon!]
}

type Query {
    pokemon(id: Int!): Pokemon
    pokemons(first: Int!, after: String): [Pokemon!]!
}
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pokemon {
    pub id: i64,
    pub name: String,
    pub element: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PokemonData {
    pub pokemon: Option<Pokemon>,
}

/// registry with the bundled schema and a built tree
pub fn registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.load_sdl(SCHEMA)?;
    registry.build_tree(DEFAULT_MAX_DEPTH);
    Ok(registry)
}

/// `GetPokemon`: id, name and element of one pokemon
pub fn get_pokemon(registry: &mut SchemaRegistry) -> Result<SavedRequest> {
    if let Some(saved) = registry.saved_request("GetPokemon") {
        return Ok(saved.clone());
    }
    for field in ["id", "name", "element"] {
        registry.toggle(&["pokemon", field]);
    }
    registry.save_request("GetPokemon", "pokemon")
}

pub async fn fetch_pokemon(
    client: &Client,
    registry: &mut SchemaRegistry,
    id: i64,
) -> Result<GraphQlResponse<PokemonData>> {
    let saved = get_pokemon(registry)?;
    client
        .execute(&saved.operation, Some(serde_json::json!({ "id": id })))
        .await
}
