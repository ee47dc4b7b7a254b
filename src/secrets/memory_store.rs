//! secrets::memory_store
//!
//! Process-local secret storage. Nothing survives the process; useful for
//! tests and for running the client without touching disk.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{SecretError, SecretStore};

/// In-memory secret store.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            data: Mutex::new(data),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> SecretError {
        SecretError::ReadError("memory store lock poisoned".into())
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let data = self.data.lock().map_err(|_| Self::poisoned())?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut data = self.data.lock().map_err(|_| Self::poisoned())?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut data = self.data.lock().map_err(|_| Self::poisoned())?;
        data.remove(key);
        Ok(())
    }
}
