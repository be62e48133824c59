//! Per-user display settings

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Chart style used when a user's stats are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Bar,
    Pie,
}

impl GraphType {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            _ => Err(format!("Invalid graph type: {s}")),
        }
    }
}

/// Settings record, one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: Snowflake,
    pub graph_type: GraphType,
    /// Whether other users may mention this user to pull their stats
    pub mention_for_stats: bool,
}

impl Settings {
    /// Defaults applied on first sight of a user
    pub fn defaults(user_id: Snowflake) -> Self {
        Self::with_graph(user_id, GraphType::default())
    }

    /// Defaults with a configured graph preference
    pub fn with_graph(user_id: Snowflake, graph_type: GraphType) -> Self {
        Self {
            user_id,
            graph_type,
            mention_for_stats: true,
        }
    }
}
