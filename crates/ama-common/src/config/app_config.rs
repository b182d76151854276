//! Application configuration structs
//!
//! Loads configuration from environment variables, or from a TOML file
//! layered with `AMA__`-prefixed environment overrides.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub hub: HubConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Public URL of the web client; the only accepted upgrade origin in production
    #[serde(default)]
    pub site_url: Option<String>,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(other.to_string()),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which repository implementation backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// Storage selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Real-time hub tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Events waiting for fan-out before new ones are dropped
    #[serde(default = "default_publish_queue_capacity")]
    pub publish_queue_capacity: usize,
    /// Frames buffered per connection before it is evicted as a slow consumer
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,
    /// How long shutdown waits for connections to unwind
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            publish_queue_capacity: default_publish_queue_capacity(),
            connection_buffer: default_connection_buffer(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "ama-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_expiry() -> i64 {
    86400 // 24 hours
}

fn default_publish_queue_capacity() -> usize {
    1024
}

fn default_connection_buffer() -> usize {
    100
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

/// Read an optional variable, failing only when it is present but unparsable
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage = StorageConfig {
            backend: parse_var("STORAGE_BACKEND")?.unwrap_or_default(),
        };

        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
            Err(_) if storage.backend == StorageBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"));
            }
            Err(_) => None,
        };

        let site_url = env::var("SITE_URL").ok().filter(|s| !s.is_empty());
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var("APP_ENV")?.unwrap_or_default(),
                site_url,
            },
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            storage,
            database,
            jwt: JwtConfig {
                secret: required_var("JWT_SECRET")?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
            },
            cors: CorsConfig { allowed_origins },
            hub: HubConfig {
                publish_queue_capacity: parse_var("HUB_PUBLISH_QUEUE_CAPACITY")?
                    .unwrap_or_else(default_publish_queue_capacity),
                connection_buffer: parse_var("HUB_CONNECTION_BUFFER")?
                    .unwrap_or_else(default_connection_buffer),
                shutdown_timeout_secs: parse_var("HUB_SHUTDOWN_TIMEOUT_SECS")?
                    .unwrap_or_else(default_shutdown_timeout_secs),
            },
        })
    }

    /// Load configuration from a TOML file, with `AMA__SECTION__KEY`
    /// environment variables taking precedence
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not describe a valid config
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .add_source(::config::Environment::with_prefix("AMA").separator("__"))
            .build()
            .and_then(|source| source.try_deserialize::<Self>())
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        config.validate()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns an error if the text does not describe a valid config
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()
            .and_then(|source| source.try_deserialize::<Self>())
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.is_none() {
            return Err(ConfigError::MissingVar("database.url"));
        }
        if self.hub.connection_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "hub.connection_buffer",
                "0".to_string(),
            ));
        }
        Ok(self)
    }

    /// Origins accepted for cross-origin requests and upgrades
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = self.cors.allowed_origins.clone();
        if let Some(url) = &self.app.site_url {
            if !origins.contains(url) {
                origins.push(url.clone());
            }
        }
        origins
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid configuration source: {0}")]
    Source(String),
}
