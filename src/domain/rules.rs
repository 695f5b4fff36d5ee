//! Mutation invariants: name rules, depth limit, cascade order.

use std::collections::{HashMap, HashSet};

use crate::domain::arena::CategoryForest;
use crate::domain::entities::{normalize_name, CategoryId, CategoryRow};
use crate::domain::error::ValidationError;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MIN_NAME_LENGTH: usize = 2;

/// Limits every hierarchy mutation is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyRules {
    /// Maximum number of levels, roots included
    pub max_depth: usize,
    /// Minimum name length after trimming
    pub min_name_length: usize,
}

impl Default for HierarchyRules {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_name_length: DEFAULT_MIN_NAME_LENGTH,
        }
    }
}

impl HierarchyRules {
    /// Returns the trimmed name when it is long enough and unused by any
    /// row other than `exclude`.
    pub fn check_name(
        &self,
        name: &str,
        rows: &[CategoryRow],
        exclude: Option<CategoryId>,
    ) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        if trimmed.chars().count() < self.min_name_length {
            return Err(ValidationError::NameTooShort {
                min: self.min_name_length,
            });
        }

        let wanted = normalize_name(trimmed);
        let taken = rows
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .any(|row| normalize_name(&row.name) == wanted);
        if taken {
            return Err(ValidationError::DuplicateName(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// A new child of `parent` must still fit within `max_depth` levels.
    pub fn check_parent(
        &self,
        forest: &CategoryForest,
        parent: CategoryId,
    ) -> Result<(), ValidationError> {
        let depth = forest
            .depth_of(parent)
            .ok_or(ValidationError::ParentNotFound(parent))?;
        if depth + 1 >= self.max_depth {
            return Err(ValidationError::DepthExceeded {
                max: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Ids of `root` and all its descendants, children before their parent.
///
/// Works on raw rows so that subtrees of orphaned rows are reachable too.
/// Returns an empty list when `root` is not among the rows.
pub fn cascade_order(rows: &[CategoryRow], root: CategoryId) -> Vec<CategoryId> {
    if !rows.iter().any(|r| r.id == root) {
        return Vec::new();
    }

    let mut children: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
    for row in rows {
        if let Some(parent) = row.parent_id {
            children.entry(parent).or_default().push(row.id);
        }
    }

    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        if !visited.insert(id) {
            continue;
        }
        stack.push((id, true));
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().rev().map(|&kid| (kid, false)));
        }
    }
    order
}
