//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use stat_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    tracing::debug!(error = %e, "Store call failed");
    DomainError::DatabaseError(e.to_string())
}
