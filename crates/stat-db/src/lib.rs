//! # stat-db
//!
//! Store layer implementing the stat-core repository traits.
//!
//! ## Overview
//!
//! - Connection pool management and schema setup for PostgreSQL
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - PostgreSQL repository implementations
//! - `MemoryStore`, an in-process implementation of every trait
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stat_db::{create_pool, run_migrations, DatabaseConfig, PgStatRepository};
//! use stat_core::StatRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let stats = PgStatRepository::new(pool);
//!     let total = stats.total_duration(None).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgBlacklistRepository, PgIconRepository, PgSettingsRepository, PgStatRepository,
};
