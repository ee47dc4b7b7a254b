//! secrets::file_store
//!
//! File-based secret storage.
//!
//! # Security
//!
//! - Secrets are stored in `~/.triage/secrets.toml` unless configured otherwise
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Secrets are NEVER logged, printed, or included in error messages
//! - File I/O runs on tokio's blocking pool, never on a runtime worker

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::{SecretError, SecretStore};

/// File-based secret storage.
///
/// Stores secrets in a flat TOML table. This is the default secret store.
///
/// Read-modify-write cycles are serialized within the process so two
/// concurrent `set` calls for different keys cannot drop each other's
/// update.
#[derive(Debug)]
pub struct FileSecretStore {
    /// Path to the secrets file
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_guard: Mutex<()>,
}

impl FileSecretStore {
    /// Create a new file secret store at the default location.
    ///
    /// The default location is `~/.triage/secrets.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        Ok(Self::with_path(Self::default_path()?))
    }

    /// Create a file secret store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_guard: Mutex::new(()),
        }
    }

    /// Default secrets file location.
    pub fn default_path() -> Result<PathBuf, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(home.join(".triage").join("secrets.toml"))
    }

    /// Get the path to the secrets file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify file permissions are correct (Unix only).
    ///
    /// Returns true if the file doesn't exist or has 0600 permissions.
    #[cfg(unix)]
    pub fn verify_permissions(&self) -> Result<bool, SecretError> {
        if !self.path.exists() {
            return Ok(true);
        }

        let metadata = fs::metadata(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read file metadata: {}", e)))?;

        let mode = metadata.permissions().mode() & 0o777;
        Ok(mode == 0o600)
    }

    /// Verify file permissions are correct (non-Unix always returns true).
    #[cfg(not(unix))]
    pub fn verify_permissions(&self) -> Result<bool, SecretError> {
        Ok(true)
    }
}

/// Run blocking file I/O off the async worker threads.
async fn blocking<T, F>(op: F) -> Result<T, SecretError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SecretError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| SecretError::ProviderNotAvailable(format!("storage task failed: {}", e)))?
}

fn read_secrets(path: &Path) -> Result<HashMap<String, String>, SecretError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| SecretError::ReadError(format!("cannot parse secrets file: {}", e)))
}

fn write_secrets(path: &Path, secrets: &HashMap<String, String>) -> Result<(), SecretError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(secrets)
        .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;

    let temp_path = path.with_extension("tmp");

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| SecretError::WriteError(format!("cannot create temp file: {}", e)))?;

        // Restrict before any content lands on disk
        #[cfg(unix)]
        {
            let permissions = fs::Permissions::from_mode(0o600);
            file.set_permissions(permissions)
                .map_err(|e| SecretError::WriteError(format!("cannot set permissions: {}", e)))?;
        }

        file.write_all(content.as_bytes())
            .map_err(|e| SecretError::WriteError(format!("cannot write secrets: {}", e)))?;

        file.sync_all()
            .map_err(|e| SecretError::WriteError(format!("cannot sync to disk: {}", e)))?;
    }

    fs::rename(&temp_path, path)
        .map_err(|e| SecretError::WriteError(format!("cannot rename temp file: {}", e)))?;

    Ok(())
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let path = self.path.clone();
        let key = key.to_string();
        blocking(move || Ok(read_secrets(&path)?.remove(&key))).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let _guard = self.write_guard.lock().await;
        let path = self.path.clone();
        let (key, value) = (key.to_string(), value.to_string());
        blocking(move || {
            let mut secrets = read_secrets(&path)?;
            secrets.insert(key, value);
            write_secrets(&path, &secrets)
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), SecretError> {
        let _guard = self.write_guard.lock().await;
        let path = self.path.clone();
        let key = key.to_string();
        blocking(move || {
            let mut secrets = read_secrets(&path)?;
            if secrets.remove(&key).is_none() && !path.exists() {
                return Ok(());
            }
            write_secrets(&path, &secrets)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileSecretStore) {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("secrets.toml");
        let store = FileSecretStore::with_path(path);
        (temp, store)
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();

        let result = store.get("accessToken").await.expect("get");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_and_get() {
        let (_temp, store) = create_test_store();

        store.set("accessToken", "T1").await.expect("set");

        let result = store.get("accessToken").await.expect("get");
        assert_eq!(result, Some("T1".to_string()));
    }

    #[tokio::test]
    async fn set_overwrites() {
        let (_temp, store) = create_test_store();

        store.set("key", "value1").await.expect("first set");
        store.set("key", "value2").await.expect("second set");

        assert_eq!(
            store.get("key").await.expect("get"),
            Some("value2".to_string())
        );
    }

    #[tokio::test]
    async fn delete_existing() {
        let (_temp, store) = create_test_store();

        store.set("key", "value").await.expect("set");
        store.delete("key").await.expect("delete");

        assert!(store.get("key").await.expect("get after delete").is_none());
    }

    #[tokio::test]
    async fn delete_nonexistent_ok() {
        let (_temp, store) = create_test_store();

        store.delete("nonexistent").await.expect("delete nonexistent");
        assert!(!store.path().exists(), "delete on empty store writes nothing");
    }

    #[tokio::test]
    async fn both_session_keys_live_side_by_side() {
        let (_temp, store) = create_test_store();

        store.set("accessToken", "T1").await.expect("set access");
        store.set("refreshToken", "R1").await.expect("set refresh");
        store.delete("accessToken").await.expect("delete access");

        assert!(store.get("accessToken").await.expect("get").is_none());
        assert_eq!(
            store.get("refreshToken").await.expect("get"),
            Some("R1".to_string())
        );
    }

    #[tokio::test]
    async fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("subdir").join("secrets.toml");
        let store = FileSecretStore::with_path(path.clone());

        assert!(!path.parent().unwrap().exists());

        store.set("key", "value").await.expect("set");

        assert!(path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn permissions_0600_on_unix() {
        let (_temp, store) = create_test_store();

        assert!(store.verify_permissions().expect("verify before write"));
        store.set("key", "value").await.expect("set");

        let metadata = fs::metadata(store.path()).expect("metadata");
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions should be 0600");
        assert!(store.verify_permissions().expect("verify after write"));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_read_error() {
        let (_temp, store) = create_test_store();

        fs::write(store.path(), "invalid = [unclosed").expect("write bad toml");

        let err = store.get("key").await.unwrap_err();
        assert!(matches!(err, SecretError::ReadError(_)));
        assert!(err.to_string().contains("cannot parse"));
    }

    #[tokio::test]
    async fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("secrets.toml");

        FileSecretStore::with_path(path.clone())
            .set("refreshToken", "R1")
            .await
            .expect("set");

        let store = FileSecretStore::with_path(path);
        assert_eq!(
            store.get("refreshToken").await.expect("get"),
            Some("R1".to_string())
        );
    }

    #[tokio::test]
    async fn special_characters_in_values() {
        let (_temp, store) = create_test_store();

        let jwt_like = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjF9.sig-_=\"quoted\"\n";
        store.set("key", jwt_like).await.expect("set");

        assert_eq!(
            store.get("key").await.expect("get"),
            Some(jwt_like.to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_sets_on_multi_thread_runtime_keep_both_keys() {
        let (_temp, store) = create_test_store();
        let store = std::sync::Arc::new(store);

        let (a, b) = tokio::join!(
            {
                let store = store.clone();
                async move { store.set("accessToken", "T1").await }
            },
            {
                let store = store.clone();
                async move { store.set("refreshToken", "R1").await }
            }
        );
        a.expect("set access");
        b.expect("set refresh");

        assert_eq!(store.get("accessToken").await.expect("get"), Some("T1".into()));
        assert_eq!(store.get("refreshToken").await.expect("get"), Some("R1".into()));
    }
}
