use graphql_explorer::{
    collect_variables, ArgumentSession, Choice, Error, ListView, Prompter, SchemaRegistry,
    ValuePrompt, DEFAULT_MAX_DEPTH,
};
use serde_json::json;
use std::collections::VecDeque;

const POKEDEX: &str = r#"
"a pokemon type"
enum Element { FIRE WATER GRASS }

input PokemonFilter { element: Element, minLevel: Int }

type Stats { hp: Int, attack: Int }

type Pokemon {
    id: Int!
    name: String
    element: Element
    stats: Stats
    evolutions(first: Int!): [Pokemon]
}

type Query {
    pokemon(id: Int!): Pokemon
    pokemons(first: Int!, after: String, filter: PokemonFilter): [Pokemon]
}
"#;

struct Script {
    answers: VecDeque<&'static str>,
    notes: Vec<String>,
}

impl Script {
    fn new(answers: &[&'static str]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            notes: Vec::new(),
        }
    }
}

impl Prompter for Script {
    async fn pick(&mut self, _view: &ListView) -> Option<Choice> {
        match self.answers.pop_front()? {
            "run" => Some(Choice::Run),
            "back" => Some(Choice::Back),
            "filter" => Some(Choice::ToggleFilter),
            other => other.parse().ok().map(Choice::Item),
        }
    }

    async fn input(&mut self, _prompt: &ValuePrompt) -> Option<String> {
        self.answers.pop_front().map(String::from)
    }

    async fn confirm(&mut self, _message: &str) -> Option<bool> {
        self.answers.pop_front().map(|answer| answer == "yes")
    }

    async fn notify(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.load_sdl(POKEDEX).expect("pokedex schema");
    registry.build_tree(DEFAULT_MAX_DEPTH);
    registry
}

#[test]
fn select_save_and_reuse_tree() {
    let mut registry = registry();
    assert!(registry.toggle(&["pokemon", "name"]));
    assert!(registry.toggle(&["pokemon", "stats", "hp"]));

    let saved = registry
        .save_request("GetPokemon", "pokemon")
        .expect("saved");
    assert_eq!(
        saved.operation,
        "query GetPokemon($id: Int!) { pokemon(id:$id) { name stats { hp } } }"
    );
    assert!(!registry
        .node(&["pokemon"])
        .expect("root")
        .is_effectively_selected());

    registry.toggle(&["pokemon", "id"]);
    let err = registry
        .save_request("GetPokemon", "pokemon")
        .expect_err("duplicate");
    match err {
        Error::DuplicateName { existing } => assert_eq!(existing.operation, saved.operation),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(registry.saved_requests().len(), 1);
    assert!(registry.node(&["pokemon", "id"]).expect("id").is_selected());
}

#[tokio::test]
#[cfg_attr(miri, ignore)]
async fn collect_variables_for_saved_request() {
    let mut registry = registry();
    registry.toggle(&["pokemons", "name"]);
    registry.toggle(&["pokemons", "evolutions", "id"]);
    let saved = registry
        .save_request("ListPokemons", "pokemons")
        .expect("saved");
    let names: Vec<_> = saved.arguments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["first", "after", "filter"]);

    let mut session = ArgumentSession::new(&registry, &saved.arguments);
    let mut script = Script::new(&[
        "run", // first is still missing
        "0", "ten", "10", // rejected, then accepted
        "2", "0", "1", // filter.element = WATER, back at the top level
        "run", "no", // decline once
        "run", "yes",
    ]);

    let variables = collect_variables(&mut session, &mut script)
        .await
        .expect("variables");
    assert_eq!(
        variables,
        json!({
            "first": 10,
            "after": null,
            "filter": {"element": "WATER", "minLevel": null}
        })
    );
    assert_eq!(script.notes, vec!["missing required arguments: first"]);
    assert!(script.answers.is_empty());
}

#[tokio::test]
#[cfg_attr(miri, ignore)]
async fn dismissed_prompts_abandon_without_variables() {
    let registry = registry();
    let request = registry.request("pokemon").expect("request");
    let mut session = ArgumentSession::new(&registry, &request.arguments);
    let mut script = Script::new(&["0", "4"]);

    assert_eq!(collect_variables(&mut session, &mut script).await, None);
    assert!(session.is_done());
}

#[test]
fn failed_reload_leaves_empty_registry() {
    let mut registry = registry();
    registry.toggle(&["pokemon", "name"]);
    registry.save_request("Keep", "pokemon").expect("saved");

    let err = registry.load_sdl("type Nope { a: Int }").expect_err("no query root");
    assert!(matches!(err, Error::Schema(_)));
    assert!(!registry.is_loaded());
    assert!(registry.tree().is_empty());
    assert_eq!(registry.saved_requests().len(), 1);
}

#[test]
fn declarations_cover_every_type() {
    let registry = registry();
    let text = registry.render_declarations();
    for name in ["Element", "PokemonFilter", "Stats", "Pokemon", "PokemonInputType", "PokemonsInputType"] {
        assert!(
            text.contains(&format!("export type {name} =")),
            "{name} missing from\n{text}"
        );
    }
}
