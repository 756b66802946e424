//! Process configuration.
//!
//! DESIGN
//! ======
//! Settings come from the YAML file named by `CONFIG_PATH`. A `.env` file, if
//! present, is loaded first so local runs can set `CONFIG_PATH` and secrets
//! there. Secrets may be supplied through the environment instead of the file:
//! `DB_PASSWORD`, `AUTH_SIGNING_KEY`, `AUTH_PASSWORD_SALT`.
//!
//! The signing key and password salt are explicit values handed to the auth
//! service at construction, so tests can run with distinct secrets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_ADDRESS: &str = "localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 4;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CONFIG_PATH is not set")]
    MissingPath,
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),
    #[error("cannot read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("cannot load .env: {0}")]
    DotEnv(dotenvy::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub env: Environment,
    #[serde(default)]
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub address: String,
    pub timeout_secs: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self { address: DEFAULT_ADDRESS.into(), timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS }
    }
}

impl HttpServerConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// In-process tables; nothing survives a restart.
    Memory,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub db_name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            host: "localhost".into(),
            port: DEFAULT_DB_PORT,
            username: "postgres".into(),
            password: String::new(),
            db_name: "bookshelf".into(),
            ssl_mode: "disable".into(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("db_name", &self.db_name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub signing_key: String,
    #[serde(default)]
    pub password_salt: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load `.env`, then the YAML file named by `CONFIG_PATH`, then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a present `.env` cannot be read, `CONFIG_PATH` is
    /// unset, the file is missing or malformed, or a required secret is empty.
    pub fn load() -> Result<Self, ConfigError> {
        accept_missing_dotenv(dotenvy::dotenv())?;
        let path = std::env::var_os("CONFIG_PATH").ok_or(ConfigError::MissingPath)?;
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// # Errors
    ///
    /// Returns an error if the document does not match the config schema.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(key) = lookup("AUTH_SIGNING_KEY") {
            self.auth.signing_key = key;
        }
        if let Some(salt) = lookup("AUTH_PASSWORD_SALT") {
            self.auth.password_salt = salt;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.signing_key.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.signing_key must not be empty".into()));
        }
        if self.auth.password_salt.is_empty() {
            return Err(ConfigError::Invalid("auth.password_salt must not be empty".into()));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_secs must be positive".into()));
        }
        if self.http_server.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http_server.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn accept_missing_dotenv(result: Result<PathBuf, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::DotEnv(e)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
