//! http client
//!
//! posts operations to a graphql endpoint and fetches its schema, either by
//! introspection or as sdl text.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::operation::SavedRequest;
use crate::registry::SchemaRegistry;
use crate::schema::introspection::INTROSPECTION_QUERY;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// graphql client for one endpoint
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl Client {
    /// create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = match &config.http_client {
            Some(http) => http.clone(),
            None => {
                let mut headers = HeaderMap::new();
                if let Some(token) = &config.token {
                    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(
                        |err| Error::Config(format!("invalid bearer token header value: {err}")),
                    )?;
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                headers.extend(config.extra_headers.clone());

                let mut builder = reqwest::Client::builder()
                    .default_headers(headers)
                    .user_agent(config.user_agent.clone())
                    .timeout(config.timeout)
                    .danger_accept_invalid_certs(!config.verify_ssl);
                if let Some(customize) = &config.http_client_builder {
                    builder = customize(builder);
                }
                builder.build()?
            }
        };

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// access the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// execute a raw graphql query
    pub async fn execute_raw(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<GraphQlResponse<serde_json::Value>> {
        let request = GraphQlRequest::new(query).with_variables(variables);
        self.post_with(request, |url, body| self.send(url, body)).await
    }

    /// execute a raw graphql query and deserialize into a typed response
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<GraphQlResponse<T>> {
        let request = GraphQlRequest::new(query).with_variables(variables);
        self.post_with(request, |url, body| self.send(url, body)).await
    }

    /// execute a saved request with collected variables
    pub async fn execute_saved(
        &self,
        saved: &SavedRequest,
        variables: Option<serde_json::Value>,
    ) -> Result<GraphQlResponse<serde_json::Value>> {
        tracing::info!(request = %saved.name, kind = saved.kind.keyword(), "executing saved request");
        let request = GraphQlRequest::new(saved.operation.clone())
            .with_variables(variables)
            .with_operation_name(saved.name.clone());
        self.post_with(request, |url, body| self.send(url, body)).await
    }

    /// run the introspection query and return its `data` object
    pub async fn introspect(&self) -> Result<serde_json::Value> {
        let request = GraphQlRequest::new(INTROSPECTION_QUERY)
            .with_operation_name("IntrospectionQuery");
        self.introspect_with(request, |url, body| self.send(url, body))
            .await
    }

    /// fetch the schema as sdl text from the configured schema url
    pub async fn fetch_schema(&self) -> Result<String> {
        self.fetch_schema_with(|url| async move {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok((status, text))
        })
        .await
    }

    /// fetch the remote schema and load it into `registry`.
    ///
    /// uses the sdl url when one is configured, introspection otherwise.
    pub async fn load_schema(&self, registry: &mut SchemaRegistry) -> Result<()> {
        if self.config.schema_url.is_some() {
            let sdl = self.fetch_schema().await?;
            registry.load_sdl(&sdl)
        } else {
            let data = self.introspect().await?;
            registry.load_introspection(data)
        }
    }

    async fn send(&self, url: Url, body: GraphQlRequest) -> Result<(StatusCode, String)> {
        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

fn parse_graphql_response<T: DeserializeOwned>(
    status: StatusCode,
    text: String,
) -> Result<GraphQlResponse<T>> {
    if !status.is_success() && serde_json::from_str::<serde_json::Value>(&text).is_err() {
        return Err(http_error("graphql", status, text));
    }

    let parsed: GraphQlResponse<T> = serde_json::from_str(&text)?;
    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .first()
            .map(|err| err.to_string())
            .unwrap_or_else(|| "graphql error".to_string());
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors: parsed.errors,
            body: text,
            message,
        });
    }

    if !status.is_success() {
        return Err(http_error("graphql", status, text));
    }

    Ok(parsed)
}

fn parse_schema_response(status: StatusCode, text: String) -> Result<String> {
    if !status.is_success() {
        return Err(http_error("schema", status, text));
    }

    Ok(text)
}

fn http_error(what: &str, status: StatusCode, body: String) -> Error {
    Error::GraphQl {
        status: Some(status.as_u16()),
        errors: Vec::new(),
        body,
        message: format!("{what} http error: {status}"),
    }
}

impl Client {
    pub(crate) async fn post_with<T: DeserializeOwned, F, Fut>(
        &self,
        request: GraphQlRequest,
        send: F,
    ) -> Result<GraphQlResponse<T>>
    where
        F: FnOnce(Url, GraphQlRequest) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let url = self.config.endpoint()?.clone();
        tracing::debug!(%url, operation = ?request.operation_name, "posting graphql request");
        let (status, text) = send(url, request).await?;
        parse_graphql_response(status, text)
    }

    pub(crate) async fn introspect_with<F, Fut>(
        &self,
        request: GraphQlRequest,
        send: F,
    ) -> Result<serde_json::Value>
    where
        F: FnOnce(Url, GraphQlRequest) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let response: GraphQlResponse<serde_json::Value> = self.post_with(request, send).await?;
        response
            .data
            .ok_or_else(|| Error::Schema("introspection returned no data".to_string()))
    }

    pub(crate) async fn fetch_schema_with<F, Fut>(&self, send: F) -> Result<String>
    where
        F: FnOnce(Url) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let url = self
            .config
            .schema_url()?
            .ok_or_else(|| Error::Config("no schema url configured".to_string()))?;
        tracing::debug!(%url, "fetching sdl");
        let (status, text) = send(url).await?;
        parse_schema_response(status, text)
    }
}
