//! gateway::pipeline
//!
//! Request descriptors and the stages that carry them.
//!
//! # Design
//!
//! Each stage is a [`Handler`] that wraps an inner handler:
//!
//! ```text
//! RetryOnUnauthorized -> BearerAuth -> HttpTransport
//! ```
//!
//! [`BearerAuth`] reads the access token when the request is sent, so a
//! retried request picks up whatever token the refresh left behind. It
//! stamps that token on the response, and [`RetryOnUnauthorized`] reports
//! exactly that token as rejected. A request is re-issued at most once,
//! keyed on the per-request `retried` flag.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::errors::GatewayError;
use crate::auth::TokenProvider;
use crate::config::ServerConfig;

/// A logical request, relative to the configured base URL.
#[derive(Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path joined onto the base URL
    pub path: String,
    /// Optional JSON body
    pub body: Option<serde_json::Value>,
    /// Extra headers
    pub headers: HeaderMap,
    retried: bool,
}

impl ApiRequest {
    /// Create a request. The retry flag always starts unset.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    /// Shorthand for a `GET`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a `POST` with a JSON body.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach an extra header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether this request has already been re-issued after a 401.
    pub fn retried(&self) -> bool {
        self.retried
    }

    fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }
}

// Custom Debug to avoid exposing the Authorization header
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.keys().map(HeaderName::as_str).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_body", &self.body.is_some())
            .field("headers", &header_names)
            .field("retried", &self.retried)
            .finish()
    }
}

/// A response as received from the server.
#[derive(Clone)]
pub struct ApiResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub body: Vec<u8>,
    /// Access token the request carried, set by [`BearerAuth`]
    sent_token: Option<String>,
}

impl ApiResponse {
    /// Build a response that no bearer stage has seen yet.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            sent_token: None,
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

// Custom Debug to avoid exposing the token the request carried
impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("authorized", &self.sent_token.is_some())
            .finish()
    }
}

/// One stage of the request pipeline.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Carry `request` and return the server's response.
    ///
    /// Non-success statuses are responses, not errors. Errors are reserved
    /// for requests that never produced a response.
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        (**self).call(request).await
    }
}

/// Innermost stage: executes requests with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    server: ServerConfig,
}

impl HttpTransport {
    /// Create a transport joining paths onto `server.base_url`.
    pub fn new(client: Client, server: &ServerConfig) -> Self {
        Self {
            client,
            server: server.clone(),
        }
    }
}

#[async_trait]
impl Handler for HttpTransport {
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let url = self.server.url(&request.path);

        let mut builder = self
            .client
            .request(request.method, url.as_str())
            .header(ACCEPT, "application/json")
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(%url, status = status.as_u16(), "request completed");
        Ok(ApiResponse::new(status, headers, body))
    }
}

/// Attaches `Authorization: Bearer <token>` from the session at send time.
pub struct BearerAuth<H> {
    inner: H,
    tokens: Arc<dyn TokenProvider>,
}

impl<H> BearerAuth<H> {
    /// Wrap `inner`, reading tokens from `tokens`.
    pub fn new(inner: H, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { inner, tokens }
    }
}

#[async_trait]
impl<H: Handler> Handler for BearerAuth<H> {
    async fn call(&self, mut request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let token = self.tokens.current_token();
        match &token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    GatewayError::InvalidRequest("access token is not a valid header value".into())
                })?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            None => {
                request.headers.remove(AUTHORIZATION);
            }
        }

        let mut response = self.inner.call(request).await?;
        response.sent_token = token;
        Ok(response)
    }
}

/// Re-issues a request once after a 401, refreshing the session first.
pub struct RetryOnUnauthorized<H> {
    inner: H,
    tokens: Arc<dyn TokenProvider>,
}

impl<H> RetryOnUnauthorized<H> {
    /// Wrap `inner`, refreshing through `tokens`.
    pub fn new(inner: H, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { inner, tokens }
    }
}

#[async_trait]
impl<H: Handler> Handler for RetryOnUnauthorized<H> {
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let response = self.inner.call(request.clone()).await?;

        if response.status != StatusCode::UNAUTHORIZED || request.retried() {
            return Ok(response);
        }

        debug!(path = %request.path, "request unauthorized; refreshing before retry");
        let outcome = self
            .tokens
            .refresh_after_rejection(response.sent_token.as_deref())
            .await;
        if outcome.is_logged_out() {
            warn!(path = %request.path, "session ended during refresh; retrying without it");
        }

        self.inner.call(request.into_retry()).await
    }
}
