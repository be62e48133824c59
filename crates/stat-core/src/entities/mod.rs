//! Domain entities - persisted stat, settings, and icon records

mod icon;
mod settings;
mod stat;

pub use icon::{BlacklistRecord, IconRecord};
pub use settings::{GraphType, Settings};
pub use stat::{StatQuery, StatRecord, StatSort};
