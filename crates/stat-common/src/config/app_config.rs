//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional `.env` file.

use serde::Deserialize;
use stat_core::GraphType;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub tracker: TrackerConfig,
    pub log: LogConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
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

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP listener for event ingest and read-only reporting
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

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// In-process store, nothing survives a restart
    Memory,
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub database: Option<DatabaseConfig>,
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

/// Engine behaviour knobs
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Graph preference given to newly seen users
    #[serde(default)]
    pub default_graph_type: GraphType,
    /// Capacity of each dispatch worker's event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Number of dispatch workers; a user's events always land on the same one
    #[serde(default = "default_dispatch_workers")]
    pub dispatch_workers: usize,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

// Default value functions
fn default_app_name() -> String {
    "statbot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_event_buffer() -> usize {
    1024
}

fn default_dispatch_workers() -> usize {
    8
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = AppSettings {
            name: lookup("APP_NAME").unwrap_or_else(default_app_name),
            env: match lookup("APP_ENV") {
                Some(s) => Environment::parse(&s)
                    .ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
                None => default_env(),
            },
        };

        let server = ServerConfig {
            host: lookup("SERVER_HOST").unwrap_or_else(default_host),
            port: parse_or(&lookup, "SERVER_PORT", default_port)?,
        };

        let backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue("STORE_BACKEND", other.to_string()))
            }
        };

        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections,
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections,
                )?,
            }),
            None if backend == StoreBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"))
            }
            None => None,
        };

        let tracker = TrackerConfig {
            default_graph_type: match lookup("DEFAULT_GRAPH_TYPE") {
                Some(s) => s
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DEFAULT_GRAPH_TYPE", s))?,
                None => GraphType::default(),
            },
            event_buffer: parse_or(&lookup, "EVENT_BUFFER", default_event_buffer)?,
            dispatch_workers: parse_or(&lookup, "DISPATCH_WORKERS", default_dispatch_workers)?,
        };

        let log = LogConfig {
            format: match lookup("LOG_FORMAT").as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(ConfigError::InvalidValue("LOG_FORMAT", other.to_string()))
                }
            },
        };

        Ok(Self {
            app,
            server,
            store: StoreConfig { backend, database },
            tracker,
            log,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_flags() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Development.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
    }

    #[test]
    fn test_memory_backend_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.database.is_none());
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.app.name, "statbot");
        assert_eq!(config.tracker.default_graph_type, GraphType::Bar);
        assert_eq!(config.tracker.event_buffer, 1024);
        assert_eq!(config.tracker.dispatch_workers, 8);
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_postgres_config() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("SERVER_PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/statbot"),
            ("DATABASE_MAX_CONNECTIONS", "32"),
            ("DEFAULT_GRAPH_TYPE", "pie"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(config.server.port, 9000);
        let db = config.store.database.unwrap();
        assert_eq!(db.max_connections, 32);
        assert_eq!(db.min_connections, 1);
        assert_eq!(config.tracker.default_graph_type, GraphType::Pie);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("SERVER_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SERVER_PORT", _)));

        let err = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "mongo")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("STORE_BACKEND", _)));
    }
}
