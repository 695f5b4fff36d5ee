//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::CategoryId;

/// A rule violated by a proposed hierarchy mutation.
///
/// Every variant maps to exactly one user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("category name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("a category named '{0}' already exists")]
    DuplicateName(String),

    #[error("parent category not found: {0}")]
    ParentNotFound(CategoryId),

    #[error("cannot add a subcategory beyond {max} levels deep")]
    DepthExceeded { max: usize },
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("path index {index} out of range for path of length {len}")]
    InvalidPathIndex { index: usize, len: usize },

    #[error("select a category in the last path before adding another one")]
    EmptyTrailingPath,

    #[error("path slot {index} out of range ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },
}
