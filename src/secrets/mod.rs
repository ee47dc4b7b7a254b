//! secrets
//!
//! Secure token storage for the two session credentials.
//!
//! # Architecture
//!
//! Secrets are stored through the async [`SecretStore`] trait, which has
//! multiple implementations:
//!
//! - [`FileSecretStore`]: Stores in `~/.triage/secrets.toml` (default)
//! - [`KeychainSecretStore`]: Uses OS keychain (optional, feature-gated)
//! - [`MemorySecretStore`]: Process-local, nothing persisted
//!
//! # Security
//!
//! - Secrets are **never** logged or included in error messages
//! - File store uses 0600 permissions on Unix (owner read/write only)
//! - File store writes are atomic (temp file + rename)

mod file_store;
mod keychain_store;
mod memory_store;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

pub use file_store::FileSecretStore;
pub use keychain_store::{KeychainSecretStore, KEYCHAIN_SERVICE};
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Names accepted by [`create_store`].
pub fn valid_provider_names() -> &'static [&'static str] {
    &["file", "keychain", "memory"]
}

/// Create a secret store based on the provider name.
///
/// # Providers
///
/// - `"file"` (default): [`FileSecretStore`] at `path`, or `~/.triage/secrets.toml`
/// - `"keychain"`: [`KeychainSecretStore`] using OS keychain (requires feature)
/// - `"memory"`: [`MemorySecretStore`]
///
/// # Errors
///
/// - Unknown provider name
/// - Keychain provider without `keychain` feature enabled
/// - Initialization errors from the store
pub fn create_store(
    provider: &str,
    path: Option<PathBuf>,
) -> Result<Arc<dyn SecretStore>, SecretError> {
    match provider {
        "file" => match path {
            Some(path) => Ok(Arc::new(FileSecretStore::with_path(path))),
            None => Ok(Arc::new(FileSecretStore::new()?)),
        },
        "keychain" => Ok(Arc::new(KeychainSecretStore::new()?)),
        "memory" => Ok(Arc::new(MemorySecretStore::new())),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: {})",
            other,
            valid_provider_names().join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn create_file_store_at_path() {
        let temp = TempDir::new().unwrap();
        let store = create_store("file", Some(temp.path().join("s.toml"))).expect("create");

        assert!(store.get("nonexistent").await.expect("get").is_none());
    }

    #[test]
    fn create_unknown_provider() {
        match create_store("vault", None) {
            Err(SecretError::ProviderNotAvailable(msg)) => {
                assert!(msg.contains("vault"));
                assert!(msg.contains("file, keychain, memory"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn create_keychain_without_feature() {
        let err = create_store("keychain", None).err().expect("expected error");
        let msg = err.to_string();
        assert!(msg.contains("keychain"));
        assert!(msg.contains("not enabled"));
    }

    #[test]
    fn default_provider_is_valid() {
        assert!(valid_provider_names().contains(&DEFAULT_PROVIDER));
    }
}
