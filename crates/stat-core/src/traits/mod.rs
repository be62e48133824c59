//! Store ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    BlacklistRepository, IconRepository, RepoResult, SettingsRepository, StatRepository,
};
