//! Application error types
//!
//! One error enum for the whole crate. The HTTP layer maps each kind to a
//! fixed status code; nothing here knows about responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing static asset, SPA document or entity
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Startup-class misconfiguration (e.g. no SPA entry document on any root)
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("data access error: {0}")]
    DataAccess(#[from] rusqlite::Error),

    /// Malformed request body or parameters
    #[error("invalid request: {0}")]
    Validation(String),

    /// Write refused because of existing state
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status code this error is reported with by the JSON API
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ResourceNotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Configuration(_) | Self::DataAccess(_) | Self::Io(_) => 500,
        }
    }

    /// UNIQUE / FOREIGN KEY / CHECK failure reported by the store
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::DataAccess(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
