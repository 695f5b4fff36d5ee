//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{CategoryId, DomainError, ValidationError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("category not found: {0}")]
    NotFound(CategoryId),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ValidationError> for ApplicationError {
    fn from(e: ValidationError) -> Self {
        ApplicationError::Domain(DomainError::Validation(e))
    }
}

impl ApplicationError {
    /// The violated rule, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ApplicationError::Domain(DomainError::Validation(v)) => Some(v),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
