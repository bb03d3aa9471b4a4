//! graphql schema explorer
//!
//! this crate turns a graphql schema into a browsable model: typed
//! declarations for every schema type, a depth-bounded request tree whose
//! leaves can be selected, operation text built from that selection, and an
//! interactive state machine that collects the operation's variables.
//!
//! start with [`SchemaRegistry`], load an sdl document or an introspection
//! result, then build the tree. [`Client`] fetches schemas and runs the
//! resulting operations.
//!
//! ## quick start
//!
//! ```
//! use graphql_explorer::SchemaRegistry;
//!
//! # fn example() -> Result<(), graphql_explorer::Error> {
//! let mut registry = SchemaRegistry::new();
//! registry.load_sdl(
//!     "type Pokemon { id: Int!, name: String } type Query { pokemon(id: Int!): Pokemon }",
//! )?;
//! registry.build_tree(5);
//! registry.toggle(&["pokemon", "name"]);
//!
//! let saved = registry.save_request("GetPokemon", "pokemon")?;
//! assert_eq!(
//!     saved.operation,
//!     "query GetPokemon($id: Int!) { pokemon(id:$id) { name } }"
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## collecting variables
//!
//! [`ArgumentSession`] is driven one [`Event`] at a time, or through a
//! [`Prompter`] with [`collect_variables`].

pub mod arguments;
mod client;
mod config;
mod error;
mod graphql;
pub mod operation;
mod registry;
pub mod schema;
pub mod tree;

pub use arguments::{
    collect_variables, ArgumentSession, Choice, Effect, Event, ListItem, ListView, Prompter,
    ValuePrompt,
};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlRequest, GraphQlResponse};
pub use operation::SavedRequest;
pub use registry::SchemaRegistry;
pub use schema::{
    EnumType, FieldDescriptor, FieldType, InputType, ObjectType, RequestDescriptor, RequestKind,
    ScalarType, UnionType,
};
pub use tree::{RequestNode, DEFAULT_MAX_DEPTH};
