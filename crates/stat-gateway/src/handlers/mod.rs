//! HTTP handlers
//!
//! Event ingest plus the read and preference endpoints used by the
//! rendering and command collaborators.

pub mod events;
pub mod health;
pub mod icons;
pub mod stats;
pub mod users;

use serde::Deserialize;
use stat_core::Snowflake;

use crate::response::GatewayError;

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, GatewayError> {
        parse_snowflake(&self.user_id, "user_id")
    }
}

/// Path parameters with user_id and game
#[derive(Debug, Deserialize)]
pub struct UserGamePath {
    pub user_id: String,
    pub game: String,
}

impl UserGamePath {
    pub fn user_id(&self) -> Result<Snowflake, GatewayError> {
        parse_snowflake(&self.user_id, "user_id")
    }
}

fn parse_snowflake(raw: &str, name: &str) -> Result<Snowflake, GatewayError> {
    Snowflake::parse(raw).map_err(|_| GatewayError::invalid_path(format!("Invalid {name} format")))
}
