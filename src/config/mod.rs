//! config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment overrides (`TRIAGE_BASE_URL`, `TRIAGE_SECRETS_PROVIDER`)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. Explicit path (the `--config` flag)
//! 2. `$TRIAGE_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/triage/config.toml`
//! 4. `~/.triage/config.toml`
//!
//! A missing file is not an error. An explicit path that does not exist is.

pub mod schema;

pub use schema::{FileConfig, SecretsConfig, ServerConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: '{0}'")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Remote service settings
    pub server: ServerConfig,
    /// Secret storage settings
    pub secrets: SecretsConfig,
    /// File the values came from, if any
    source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed, if `explicit` does not exist, or if validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let file = match &source {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        let mut config = Config {
            server: file.server,
            secrets: file.secrets,
            source,
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text (no env overrides).
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        let config = Config {
            server: file.server,
            secrets: file.secrets,
            source: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.secrets.validate()
    }

    /// Path of the file the configuration was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Default location new config files are written to.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".triage").join("config.toml"))
    }

    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TRIAGE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("triage/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        Self::default_path().filter(|path| path.exists())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = var("TRIAGE_BASE_URL").filter(|v| !v.is_empty()) {
            self.server.base_url = base_url;
        }
        if let Some(provider) = var("TRIAGE_SECRETS_PROVIDER").filter(|v| !v.is_empty()) {
            self.secrets.provider = provider;
        }
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
