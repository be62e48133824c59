//! # stat-core
//!
//! Domain layer containing ids, stat/settings/icon entities, and the store
//! traits the tracking engine persists through.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    BlacklistRecord, GraphType, IconRecord, Settings, StatQuery, StatRecord, StatSort,
};
pub use error::DomainError;
pub use traits::{
    BlacklistRepository, IconRepository, RepoResult, SettingsRepository, StatRepository,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
