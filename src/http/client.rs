//! Transport trait and reqwest implementation
//!
//! `HttpTransport` handles:
//! - Joining endpoint paths onto the configured base URL
//! - Running every request through the `RequestAuthorizer`
//! - Mapping connection failures to `Error::Transport`

use crate::auth::RequestAuthorizer;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// One outgoing call, before authorization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL (absolute URLs pass through)
    pub path: String,
    /// Query parameters; repeated keys are allowed
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: StringMap,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl OutboundRequest {
    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw transport response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What the data layer requires from an HTTP transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return its status and body
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport that authorizes every request
pub struct HttpTransport {
    client: Client,
    base_url: String,
    authorizer: RequestAuthorizer,
}

impl HttpTransport {
    /// Create a transport from client config
    pub fn new(config: &ClientConfig, authorizer: RequestAuthorizer) -> Result<Self> {
        Self::with_options(
            &config.base_url,
            config.timeout(),
            &config.user_agent,
            authorizer,
        )
    }

    /// Create a transport with explicit options
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        authorizer: RequestAuthorizer,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            authorizer,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Build the authorized reqwest request for an outbound call
    pub fn build_request(&self, request: &OutboundRequest) -> Result<reqwest::Request> {
        let url = url::Url::parse(&self.build_url(&request.path))?;

        let mut builder = self.client.request(request.method.into(), url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let built = builder
            .build()
            .map_err(|e| Error::transport(format!("Failed to build request: {e}")))?;
        Ok(self.authorizer.authorize(built))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        let built = self.build_request(&request)?;
        debug!("Sending {} {}", request.method, built.url());

        let response = self
            .client
            .execute(built)
            .await
            .map_err(|e| Error::transport(describe_reqwest_error(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read body: {e}")))?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("authorizer", &self.authorizer)
            .finish_non_exhaustive()
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
