//! secrets::traits
//!
//! Secret storage trait definition.
//!
//! # Design
//!
//! The `SecretStore` trait is an async key-value interface for the two
//! session credentials. Keys are stored as-is. There is no transaction
//! spanning more than one key: writing the access token and then the
//! refresh token is two independent operations, and a caller may observe
//! the first without the second if the process dies in between.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secrets in error messages
//! - Use secure storage mechanisms appropriate to the platform
//! - Be thread-safe (Send + Sync)
//!
//! # Example
//!
//! ```ignore
//! use triage_client::secrets::{SecretStore, SecretError};
//!
//! async fn has_session(store: &dyn SecretStore) -> Result<bool, SecretError> {
//!     Ok(store.get("accessToken").await?.is_some())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from secret storage operations.
///
/// Note: Error messages intentionally do not include secret values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Trait for secret storage providers.
///
/// Implementations must be thread-safe (Send + Sync) and must never
/// log, print, or include secret values in error messages.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Get a secret by key.
    ///
    /// Returns `Ok(Some(value))` if the secret exists.
    /// Returns `Ok(None)` if the secret does not exist.
    /// Returns `Err` if there was an error accessing the store.
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Set a secret.
    ///
    /// Overwrites any existing value for the key.
    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Delete a secret.
    ///
    /// Returns `Ok(())` even if the secret did not exist.
    /// This makes delete idempotent.
    async fn delete(&self, key: &str) -> Result<(), SecretError>;
}
