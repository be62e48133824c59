//! Database models - SQLx-compatible structs for PostgreSQL tables

mod icon;
mod settings;
mod stat;

pub use icon::IconModel;
pub use settings::SettingsModel;
pub use stat::{StatModel, VisibilityCountModel};
