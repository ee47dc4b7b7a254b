//! gateway
//!
//! Authenticated request gateway.
//!
//! Every protected request goes through a [`Gateway`], which attaches the
//! current access token and, on a 401, refreshes the session and re-issues
//! the request exactly once.
//!
//! # Example
//!
//! ```ignore
//! use triage_client::gateway::Gateway;
//!
//! let gateway = Gateway::new(http, &config.server, session.clone());
//! let calls: Vec<serde_json::Value> = gateway.get_json("/api/calls/").await?;
//! ```

mod errors;
mod pipeline;

pub use errors::GatewayError;
pub use pipeline::{
    ApiRequest, ApiResponse, BearerAuth, Handler, HttpTransport, RetryOnUnauthorized,
};

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::config::ServerConfig;

/// Front of the request pipeline.
#[derive(Clone)]
pub struct Gateway {
    pipeline: Arc<dyn Handler>,
}

impl Gateway {
    /// Build the standard pipeline over `client`.
    pub fn new(client: Client, server: &ServerConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let transport = HttpTransport::new(client, server);
        let authed = BearerAuth::new(transport, tokens.clone());
        Self::with_handler(RetryOnUnauthorized::new(authed, tokens))
    }

    /// Use a custom pipeline.
    pub fn with_handler(pipeline: impl Handler + 'static) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Send a request. Every status, including a final 401, is returned as
    /// a response.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.pipeline.call(request).await
    }

    /// `GET` `path` and decode a successful JSON body.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Unauthorized`] when the request is still rejected
    ///   after the retry
    /// - [`GatewayError::Status`] for any other non-2xx status
    /// - [`GatewayError::Decode`] when the body is not the expected JSON
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self.send(ApiRequest::get(path)).await?;
        match response.status {
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
            status if !status.is_success() => Err(GatewayError::Status {
                status: status.as_u16(),
            }),
            _ => response.json(),
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}
