//! error types
//!
//! structured errors for schema loading, saved requests, argument
//! collection, and the http transport.

use crate::graphql::GraphQlError;
use crate::operation::SavedRequest;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for schema, request, and transport helpers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("no request named {0:?} in the current tree")]
    UnknownRequest(String),

    #[error("invalid request name: {0:?}")]
    InvalidName(String),

    #[error("a saved request named {:?} already exists", .existing.name)]
    DuplicateName {
        /// the saved request that already owns the name
        existing: Box<SavedRequest>,
    },

    #[error("variable ${name} is declared as both {first} and {second}")]
    ConflictingVariable {
        name: String,
        /// type of the first declaration
        first: String,
        /// type of the clashing declaration
        second: String,
    },

    #[error("missing required arguments: {}", .missing.join(", "))]
    IncompleteArguments {
        /// dotted paths of every unset required argument
        missing: Vec<String>,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graphql error: {message}")]
    GraphQl {
        /// http status if available
        status: Option<u16>,
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// raw response body
        body: String,
        /// top-level message
        message: String,
    },
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::GraphQl { status: Some(401 | 403), .. })
            || matches!(self, Error::Http(err) if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED))
    }

    /// true if the caller should ask for a different name and retry
    pub fn is_name_conflict(&self) -> bool {
        matches!(self, Error::DuplicateName { .. } | Error::InvalidName(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RequestKind;

    #[test]
    fn test_is_auth_error() {
        let err = Error::GraphQl {
            status: Some(401),
            errors: vec![],
            body: String::new(),
            message: "unauthorized".to_string(),
        };
        assert!(err.is_auth_error());

        let err = Error::GraphQl {
            status: Some(500),
            errors: vec![],
            body: String::new(),
            message: "server error".to_string(),
        };
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_duplicate_name_message() {
        let existing = SavedRequest {
            name: "GetPokemon".to_string(),
            kind: RequestKind::Query,
            return_type: "Pokemon".to_string(),
            operation: "query GetPokemon { pokemon { name } }".to_string(),
            input_type: "PokemonInputType".to_string(),
            arguments: vec![],
        };
        let err = Error::DuplicateName {
            existing: Box::new(existing),
        };
        assert!(err.is_name_conflict());
        assert_eq!(
            err.to_string(),
            "a saved request named \"GetPokemon\" already exists"
        );
    }

    #[test]
    fn test_incomplete_arguments_message() {
        let err = Error::IncompleteArguments {
            missing: vec!["first".to_string(), "filter.name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required arguments: first, filter.name"
        );
        assert!(!err.is_name_conflict());
    }
}
