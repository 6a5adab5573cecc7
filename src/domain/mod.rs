// Domain layer - business rules with no HTTP concerns
// Handlers call into HbnbFacade; the facade talks to repositories only

pub mod amenities;
pub mod facade;
pub mod places;
pub mod reviews;
pub mod users;
pub mod validation;

#[cfg(test)]
mod tests;

use crate::auth::PasswordError;
use crate::db::DatabaseError;

// Domain error type - no HTTP concerns
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(msg) => DomainError::NotFound(msg),
            DatabaseError::IntegrityError(msg) => DomainError::Conflict(msg),
            e if e.is_integrity_error() => DomainError::Conflict(e.to_string()),
            e => DomainError::Database(e.to_string()),
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(e: PasswordError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// The authenticated caller of a facade operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }

    /// True for admins and for the user `user_id` itself
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.is_admin || self.user_id == user_id
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Admin privileges required".to_string()))
        }
    }
}

pub use facade::HbnbFacade;
