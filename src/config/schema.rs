//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the base URL must be http(s), paths
//! must be non-empty, the timeout must be bounded, and the secrets provider
//! must be a known name.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "https://triage.voicemate.nl";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound accepted for `timeout_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Connect timeout applied to every request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [server]
/// base_url = "https://triage.voicemate.nl"
/// timeout_secs = 30
///
/// [secrets]
/// provider = "file"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote service settings
    pub server: ServerConfig,

    /// Secret storage settings
    pub secrets: SecretsConfig,
}

/// Remote service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL every path is joined onto
    pub base_url: String,

    /// Login endpoint path
    pub token_path: String,

    /// Refresh endpoint path
    pub refresh_path: String,

    /// Record listing path
    pub records_path: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_path: "/api/user/token/".to_string(),
            refresh_path: "/api/user/token/refresh/".to_string(),
            records_path: "/api/calls/".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the HTTP client shared by the session and the gateway.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("triage-client/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "server.base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        for (name, value) in [
            ("server.token_path", &self.token_path),
            ("server.refresh_path", &self.refresh_path),
            ("server.records_path", &self.records_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", name)));
            }
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue(format!(
                "server.timeout_secs must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }
}

/// Secret storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider name: "file", "keychain", or "memory"
    pub provider: String,

    /// File store location (file provider only)
    pub path: Option<PathBuf>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            provider: crate::secrets::DEFAULT_PROVIDER.to_string(),
            path: None,
        }
    }
}

impl SecretsConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = crate::secrets::valid_provider_names();
        if !valid.contains(&self.provider.as_str()) {
            return Err(ConfigError::InvalidValue(format!(
                "invalid secrets provider '{}', must be one of: {}",
                self.provider,
                valid.join(", ")
            )));
        }
        Ok(())
    }
}
