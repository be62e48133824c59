//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, LogConfig, LogFormat,
    ServerConfig, StoreBackend, StoreConfig, TrackerConfig,
};
