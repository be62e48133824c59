//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not tracked: {0}")]
    UserNotFound(Snowflake),

    #[error("No stats for user {user_id} in {game}")]
    StatNotFound { user_id: Snowflake, game: String },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Activity name must not be empty")]
    EmptyActivity,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::StatNotFound { .. } => "UNKNOWN_STAT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyActivity => "EMPTY_ACTIVITY",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::StatNotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::EmptyActivity)
    }

    /// Check if the store could not be reached or failed the call
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}
