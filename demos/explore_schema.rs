use graphql_explorer::{SchemaRegistry, DEFAULT_MAX_DEPTH};

const SCHEMA: &str = r#"
enum Element { FIRE WATER GRASS }
type Stats { hp: Int, attack: Int }
type Pokemon { id: Int!, name: String, element: Element, stats: Stats, evolutions: [Pokemon] }
type Query { pokemon(id: Int!): Pokemon, pokemons(first: Int!, after: String): [Pokemon] }
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = SchemaRegistry::new();
    registry.load_sdl(SCHEMA)?;

    println!("{}", registry.render_declarations());

    registry.build_tree(DEFAULT_MAX_DEPTH);
    registry.toggle(&["pokemon", "name"]);
    registry.toggle(&["pokemon", "stats", "hp"]);

    let saved = registry.save_request("GetPokemon", "pokemon")?;
    println!("{}", saved.operation);
    Ok(())
}
