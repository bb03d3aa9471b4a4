//! graphql wire types
//!
//! request body plus response and error wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// body posted to a graphql endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    /// request with an empty variables object
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: serde_json::Value::Object(serde_json::Map::new()),
            operation_name: None,
        }
    }

    /// `None` keeps the empty object
    pub fn with_variables(mut self, variables: Option<serde_json::Value>) -> Self {
        if let Some(variables) = variables {
            self.variables = variables;
        }
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// graphql response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    /// response data or null if errors
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// graphql error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// optional extensions payload
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(loc) = self.locations.first() {
            write!(f, " at {}:{}", loc.line, loc.column)?;
        }
        Ok(())
    }
}

/// graphql error location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let ok: GraphQlResponse<serde_json::Value> = GraphQlResponse {
            data: Some(serde_json::json!({"ok": true})),
            errors: vec![],
        };
        assert!(!ok.has_errors());

        let err = GraphQlResponse::<serde_json::Value> {
            data: None,
            errors: vec![GraphQlError {
                message: "boom".to_string(),
                locations: vec![GraphQlLocation { line: 1, column: 9 }],
                path: vec![],
                extensions: None,
            }],
        };
        assert!(err.has_errors());
        assert_eq!(err.errors[0].to_string(), "boom at 1:9");
    }

    #[test]
    fn test_request_body() {
        let body = GraphQlRequest::new("query Q { ok }").with_operation_name("Q");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"query": "query Q { ok }", "variables": {}, "operationName": "Q"})
        );

        let body = GraphQlRequest::new("{ ok }").with_variables(Some(serde_json::json!({"a": 1})));
        let text = serde_json::to_string(&body).unwrap();
        assert_eq!(text, r#"{"query":"{ ok }","variables":{"a":1}}"#);
    }
}
