//! Error types shared by every affiliate crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AffiliateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A transition was attempted from the wrong side or the wrong state.
    #[error("{message}")]
    InvalidAffiliation {
        message: String,
        details: Vec<String>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    /// The organization to affiliate with does not exist.
    #[error("Invalid organization to affiliate with: {0}")]
    InvalidAffiliateWith(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AffiliateError {
    /// Shorthand for a validation error carrying field messages.
    pub fn validation(details: Vec<String>) -> Self {
        AffiliateError::Validation {
            message: details.join("; "),
            details,
        }
    }
}

pub type AffiliateResult<T> = Result<T, AffiliateError>;
