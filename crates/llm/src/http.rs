//! Shared HTTP transport for every backend.
//!
//! `Dispatcher` wraps a `reqwest::Client` with pre-configured headers,
//! query parameters and the endpoint URL for one request. Adapters build a
//! dispatcher from the model selection; the exchange driver only calls
//! `send` and reads the response.

use crate::Error;
use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use std::time::Duration;

/// Pre-configured HTTP transport for one endpoint.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: Client,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    endpoint: String,
}

impl Dispatcher {
    /// Create a dispatcher with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self, Error> {
        let mut dispatcher = Self::no_auth(client, endpoint);
        dispatcher
            .headers
            .insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(dispatcher)
    }

    /// Create a dispatcher without authentication (e.g. Ollama).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            client,
            headers,
            query: Vec::new(),
            endpoint: endpoint.to_owned(),
        }
    }

    /// Add a custom header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        self.headers
            .insert(name.parse::<HeaderName>()?, value.parse::<HeaderValue>()?);
        Ok(self)
    }

    /// Add a query parameter (e.g. Gemini's `key`).
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_owned(), value.to_owned()));
        self
    }

    /// POST a JSON body. The timeout covers the whole exchange, body
    /// reads included.
    pub async fn send(&self, body: &Value, timeout: Duration) -> Result<Response, Error> {
        Ok(self.request(body).timeout(timeout).send().await?)
    }

    /// POST a JSON body for a streamed reply. The timeout bounds the wait
    /// for response headers only, the body may stream for as long as it
    /// takes.
    pub async fn open(&self, body: &Value, timeout: Duration) -> Result<Response, Error> {
        let response = tokio::time::timeout(timeout, self.request(body).send())
            .await
            .map_err(|_| Error::Timeout(timeout))?;
        Ok(response?)
    }

    fn request(&self, body: &Value) -> RequestBuilder {
        tracing::trace!("request: {body}");
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone());
        let request = if self.query.is_empty() {
            request
        } else {
            request.query(&self.query)
        };
        request.json(body)
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the query parameters.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}
