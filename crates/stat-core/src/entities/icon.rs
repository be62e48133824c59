//! Icon reference data consulted by renderers

use serde::{Deserialize, Serialize};

/// Cached icon location for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRecord {
    pub game: String,
    pub location: String,
    /// Display color as `#rrggbb`
    pub color: Option<String>,
}

impl IconRecord {
    pub fn new(game: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            location: location.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A game whose icon must never be looked up
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlacklistRecord {
    pub game: String,
}

impl BlacklistRecord {
    pub fn new(game: impl Into<String>) -> Self {
        Self { game: game.into() }
    }
}
