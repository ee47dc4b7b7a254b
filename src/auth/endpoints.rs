//! auth::endpoints
//!
//! HTTP client for the two authentication endpoints.
//!
//! # Endpoints
//!
//! - `POST {token_path}` with `{"email", "password"}`; success is 2xx with
//!   non-empty `access` and `refresh` strings
//! - `POST {refresh_path}` with `{"refresh"}`; success is 2xx with a
//!   non-empty `access` string
//!
//! Any other status or shape is a domain failure: [`AuthError::AuthFailure`]
//! for login, [`AuthError::RefreshFailure`] for refresh. Transport errors are
//! [`AuthError::Network`].
//!
//! This module performs no state changes; it only talks to the server.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::AuthError;
use crate::config::ServerConfig;

/// Credential pair returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access: String,
    /// Longer-lived credential used to mint new access tokens.
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Both fields optional so a partial body is reported as a domain failure,
/// not a parse error.
#[derive(Deserialize)]
struct TokenResponse {
    access: Option<String>,
    refresh: Option<String>,
}

/// Which endpoint a response came from; picks the failure variant.
#[derive(Clone, Copy)]
enum Endpoint {
    Login,
    Refresh,
}

impl Endpoint {
    fn failure(self, message: String) -> AuthError {
        match self {
            Endpoint::Login => AuthError::AuthFailure(message),
            Endpoint::Refresh => AuthError::RefreshFailure(message),
        }
    }
}

/// Client for the authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthEndpoints {
    client: Client,
    token_url: String,
    refresh_url: String,
}

impl AuthEndpoints {
    /// Create an endpoint client sharing `client` (and its timeouts).
    pub fn new(client: Client, server: &ServerConfig) -> Self {
        Self {
            client,
            token_url: server.url(&server.token_path),
            refresh_url: server.url(&server.refresh_path),
        }
    }

    /// The login endpoint URL.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// The refresh endpoint URL.
    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Exchange an identifier and secret for a token pair.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AuthFailure`] on non-2xx, non-JSON, or a body missing
    ///   either token
    /// - [`AuthError::Network`] on transport failure
    pub async fn obtain_pair(&self, identifier: &str, secret: &str) -> Result<TokenPair, AuthError> {
        debug!(url = %self.token_url, "requesting token pair");

        let response = self
            .client
            .post(&self.token_url)
            .headers(Self::headers())
            .json(&LoginRequest {
                email: identifier,
                password: secret,
            })
            .send()
            .await?;

        let body = Self::read_body(response, Endpoint::Login).await?;
        match (non_empty(body.access), non_empty(body.refresh)) {
            (Some(access), Some(refresh)) => Ok(TokenPair { access, refresh }),
            (access, refresh) => Err(AuthError::AuthFailure(format!(
                "response missing {}",
                missing_fields(access.is_none(), refresh.is_none())
            ))),
        }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RefreshFailure`] on non-2xx, non-JSON, or a body
    ///   without `access`
    /// - [`AuthError::Network`] on transport failure
    pub async fn refresh_access(&self, refresh_token: &str) -> Result<String, AuthError> {
        debug!(url = %self.refresh_url, "requesting access token refresh");

        let response = self
            .client
            .post(&self.refresh_url)
            .headers(Self::headers())
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        let body = Self::read_body(response, Endpoint::Refresh).await?;
        non_empty(body.access)
            .ok_or_else(|| AuthError::RefreshFailure("response missing access".into()))
    }

    async fn read_body(
        response: reqwest::Response,
        endpoint: Endpoint,
    ) -> Result<TokenResponse, AuthError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(endpoint.failure(status_message(status)));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| endpoint.failure(format!("malformed response: {}", e)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn missing_fields(access: bool, refresh: bool) -> &'static str {
    match (access, refresh) {
        (true, true) => "access and refresh",
        (true, false) => "access",
        _ => "refresh",
    }
}

fn status_message(status: StatusCode) -> String {
    format!("server returned {}", status)
}
