//! Error types for the echelon store

use thiserror::Error;

/// Echelon store errors
#[derive(Debug, Error)]
pub enum EchelonError {
    /// Scope is empty or leads with the configured separator
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Member type outside the closed USER/GROUP set
    #[error("Invalid member type: {0}")]
    InvalidMemberType(String),

    /// Backend unreachable or a write was rejected
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<crate::scope::ScopeError> for EchelonError {
    fn from(err: crate::scope::ScopeError) -> Self {
        EchelonError::InvalidScope(err.to_string())
    }
}

/// Result type for echelon operations
pub type Result<T> = std::result::Result<T, EchelonError>;
