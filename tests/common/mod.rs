//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use triage_client::secrets::{MemorySecretStore, SecretError, SecretStore};

/// An unsigned JWT-shaped token whose only claim is `exp`.
pub fn unsigned_token_with_expiry(exp: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp.timestamp()));
    format!("{}.{}.", header, payload)
}

/// Memory store that refuses writes to one key.
pub struct FailingWrites {
    pub inner: Arc<MemorySecretStore>,
    pub key: &'static str,
}

#[async_trait]
impl SecretStore for FailingWrites {
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        if key == self.key {
            return Err(SecretError::WriteError("disk full".into()));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), SecretError> {
        self.inner.delete(key).await
    }
}
