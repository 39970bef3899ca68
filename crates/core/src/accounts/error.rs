//! Chart of accounts error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while registering or updating accounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent is missing or the level does not sit below it.
    #[error("Invalid account hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidHierarchy(_) => "INVALID_HIERARCHY",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_) => 409,
            Self::InvalidHierarchy(_) => 400,
            Self::NotFound(_) => 404,
        }
    }
}
