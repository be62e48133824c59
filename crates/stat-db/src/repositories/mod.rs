//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in stat-core.

mod error;
mod icon;
mod settings;
mod stat;

pub use icon::{PgBlacklistRepository, PgIconRepository};
pub use settings::PgSettingsRepository;
pub use stat::PgStatRepository;
