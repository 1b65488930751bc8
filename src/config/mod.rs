//! Configuration management
//!
//! This module handles loading and parsing configuration for the Folio backend.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Table store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Admin authentication configuration
    #[serde(default)]
    pub admin: AdminConfig,
    /// Seed sample content into an empty SQLite store on startup
    #[serde(default)]
    pub seed_demo_data: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Table store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store driver (sqlite or remote)
    #[serde(default)]
    pub driver: StoreDriver,
    /// SQLite database path (used when driver is sqlite)
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    /// Base URL of the hosted table service (used when driver is remote)
    #[serde(default)]
    pub remote_url: Option<String>,
    /// API key for the hosted table service
    #[serde(default)]
    pub remote_api_key: Option<String>,
    /// Number of times a failed remote read is retried (no backoff)
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            driver: StoreDriver::default(),
            sqlite_path: default_sqlite_path(),
            remote_url: None,
            remote_api_key: None,
            read_retries: default_read_retries(),
        }
    }
}

fn default_sqlite_path() -> String {
    "data/folio.db".to_string()
}

fn default_read_retries() -> u32 {
    2
}

/// Table store driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    /// Local SQLite database (default)
    #[default]
    Sqlite,
    /// Hosted REST table service
    Remote,
}

impl StoreDriver {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreDriver::Sqlite => "sqlite",
            StoreDriver::Remote => "remote",
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries per cache bucket
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    10_000
}

/// Admin authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Argon2 hash of the admin password (PHC string format).
    /// Empty hash disables admin login entirely.
    #[serde(default)]
    pub password_hash: String,
    /// Admin session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password_hash: String::new(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

fn default_session_ttl_hours() -> u64 {
    24
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let config = Self::load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Validation runs after the overrides apply, so a value required by
    /// the file (such as the remote URL) may be supplied by environment
    /// alone. Environment variables follow the pattern:
    /// - FOLIO_SERVER_HOST
    /// - FOLIO_SERVER_PORT
    /// - FOLIO_STORE_DRIVER
    /// - FOLIO_STORE_SQLITE_PATH
    /// - FOLIO_STORE_REMOTE_URL
    /// - FOLIO_STORE_REMOTE_API_KEY
    /// - FOLIO_ADMIN_PASSWORD_HASH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse the file without validating cross-field constraints
    fn load_file(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: format_yaml_error(&e),
        })?;

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("FOLIO_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("FOLIO_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("FOLIO_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("FOLIO_STORE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.store.driver = StoreDriver::Sqlite,
                "remote" => self.store.driver = StoreDriver::Remote,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(path) = std::env::var("FOLIO_STORE_SQLITE_PATH") {
            self.store.sqlite_path = path;
        }
        if let Ok(url) = std::env::var("FOLIO_STORE_REMOTE_URL") {
            self.store.remote_url = Some(url);
        }
        if let Ok(key) = std::env::var("FOLIO_STORE_REMOTE_API_KEY") {
            self.store.remote_api_key = Some(key);
        }

        if let Ok(hash) = std::env::var("FOLIO_ADMIN_PASSWORD_HASH") {
            self.admin.password_hash = hash;
        }
    }

    /// Validate cross-field constraints
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.driver == StoreDriver::Remote && self.store.remote_url.is_none() {
            return Err(ConfigError::ValidationError(
                "store.remote_url is required when store.driver is 'remote'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
