//! Domain layer: the category forest and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod paths;
pub mod reconstruct;
pub mod rules;
pub mod selector;

pub use arena::{CategoryForest, CategoryNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::{DomainError, ValidationError};
pub use paths::PathSet;
pub use reconstruct::PathReconstructor;
pub use rules::{cascade_order, HierarchyRules};
pub use selector::PathSelector;

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
