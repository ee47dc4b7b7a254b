//! client
//!
//! Wiring for a configured client.
//!
//! [`TriageClient`] builds the one HTTP client, the secret store, the
//! session manager, and the gateway, and hands out references to each.
//! There is no global session; whoever needs it receives it from here.
//!
//! # Example
//!
//! ```ignore
//! use triage_client::client::TriageClient;
//! use triage_client::config::Config;
//!
//! let client = TriageClient::new(Config::load(None)?)?;
//! client.session().bootstrap().await;
//! let calls = client.list_calls().await?;
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::auth::{AuthEndpoints, SessionManager};
use crate::config::Config;
use crate::gateway::{Gateway, GatewayError};
use crate::records::{self, CallRecord};
use crate::secrets::{self, SecretError, SecretStore};

/// Errors from assembling a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(String),

    #[error(transparent)]
    Storage(#[from] SecretError),
}

/// A configured client: session plus gateway sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct TriageClient {
    config: Config,
    session: Arc<SessionManager>,
    gateway: Gateway,
}

impl TriageClient {
    /// Build a client using the secret store named in `config`.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let store = secrets::create_store(&config.secrets.provider, config.secrets.path.clone())?;
        Self::with_store(config, store)
    }

    /// Build a client over an explicit store.
    pub fn with_store(config: Config, store: Arc<dyn SecretStore>) -> Result<Self, ClientError> {
        let http = config
            .server
            .http_client()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let endpoints = AuthEndpoints::new(http.clone(), &config.server);
        let session = Arc::new(SessionManager::new(endpoints, store));
        let gateway = Gateway::new(http, &config.server, session.clone());

        Ok(Self {
            config,
            session,
            gateway,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The authenticated request gateway.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Fetch call records.
    pub async fn list_calls(&self) -> Result<Vec<CallRecord>, GatewayError> {
        records::list_calls(&self.gateway, &self.config.server).await
    }
}
