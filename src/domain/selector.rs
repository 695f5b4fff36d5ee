//! Drill-down path selection over a category forest.

use tracing::trace;

use crate::domain::arena::{CategoryForest, CategoryNode};
use crate::domain::entities::{CategoryId, LevelEntry, SelectionPath};
use crate::domain::error::DomainError;

/// Drill-down state: a fixed forest plus the path selected so far.
///
/// Transitions are pure and return the next state; the new state's
/// [`path`](Self::path) is the full path the owner should record.
#[derive(Debug, Clone)]
pub struct PathSelector<'a> {
    forest: &'a CategoryForest,
    path: SelectionPath,
}

impl<'a> PathSelector<'a> {
    pub fn new(forest: &'a CategoryForest) -> Self {
        Self {
            forest,
            path: SelectionPath::new(),
        }
    }

    pub fn with_path(forest: &'a CategoryForest, path: SelectionPath) -> Self {
        Self { forest, path }
    }

    pub fn path(&self) -> &SelectionPath {
        &self.path
    }

    pub fn into_path(self) -> SelectionPath {
        self.path
    }

    /// Children at the position reached by walking the path from the roots.
    ///
    /// Empty when an id does not resolve at its level or the reached node
    /// has no children: "no further options", not an error.
    pub fn current_level(&self) -> Vec<&'a CategoryNode> {
        let forest = self.forest;
        let mut level: Vec<&'a CategoryNode> = forest.roots().collect();
        for id in &self.path {
            let Some(next) = level.iter().find(|n| n.id == *id).copied() else {
                trace!(%id, "path id does not resolve at its level");
                return Vec::new();
            };
            level = forest.children(next).collect();
        }
        level
    }

    pub fn current_entries(&self) -> Vec<LevelEntry> {
        self.current_level()
            .into_iter()
            .map(|n| LevelEntry {
                id: n.id,
                name: n.name.clone(),
                has_children: n.has_children(),
            })
            .collect()
    }

    /// Appends `id`. Membership in `current_level()` is the caller's contract.
    #[must_use]
    pub fn select(&self, id: CategoryId) -> Self {
        let mut path = self.path.clone();
        path.push(id);
        self.transition(path)
    }

    /// Truncates the path to `index + 1` entries.
    pub fn backtrack(&self, index: usize) -> Result<Self, DomainError> {
        if index >= self.path.len() {
            return Err(DomainError::InvalidPathIndex {
                index,
                len: self.path.len(),
            });
        }
        let mut path = self.path.clone();
        path.truncate(index + 1);
        Ok(self.transition(path))
    }

    #[must_use]
    pub fn clear(&self) -> Self {
        self.transition(SelectionPath::new())
    }

    /// Replaces the path wholesale when editing an existing item.
    ///
    /// An empty seed never overrides a path that is already set.
    #[must_use]
    pub fn reseed(&self, initial: SelectionPath) -> Self {
        if initial.is_empty() && !self.path.is_empty() {
            trace!(path = %self.path, "ignoring empty re-seed");
            return self.clone();
        }
        self.transition(initial)
    }

    /// Display name of the node at `path[index]`.
    pub fn label_for(&self, index: usize) -> Option<&'a str> {
        let id = self.path.ids().get(index)?;
        self.forest.get(*id).map(|n| n.name.as_str())
    }

    /// Resolved names along the path, for breadcrumb rendering.
    pub fn breadcrumb(&self) -> Vec<&'a str> {
        (0..self.path.len())
            .filter_map(|i| self.label_for(i))
            .collect()
    }

    fn transition(&self, path: SelectionPath) -> Self {
        trace!(%path, "path changed");
        Self {
            forest: self.forest,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::entities::CategoryRow;

    fn forest() -> CategoryForest {
        TreeBuilder::new().build(&[
            CategoryRow::new(1, "Armies", None),
            CategoryRow::new(2, "Elves", Some(1)),
            CategoryRow::new(3, "High Elves", Some(2)),
            CategoryRow::new(4, "Wood Elves", Some(2)),
            CategoryRow::new(5, "Dwarfs", Some(1)),
            CategoryRow::new(6, "Terrain", None),
        ])
    }

    fn names(nodes: &[&CategoryNode]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn empty_path_offers_roots() {
        let forest = forest();
        let selector = PathSelector::new(&forest);
        assert_eq!(names(&selector.current_level()), vec!["Armies", "Terrain"]);
    }

    #[test]
    fn select_then_backtrack_returns_to_first_level() {
        let forest = forest();
        let selector = PathSelector::new(&forest)
            .select(CategoryId(1))
            .select(CategoryId(2))
            .select(CategoryId(3));
        assert_eq!(selector.path(), &SelectionPath::from(vec![1, 2, 3]));

        let selector = selector.backtrack(0).unwrap();

        assert_eq!(selector.path(), &SelectionPath::from(vec![1]));
        assert_eq!(names(&selector.current_level()), vec!["Elves", "Dwarfs"]);
    }

    #[test]
    fn transitions_leave_previous_state_untouched() {
        let forest = forest();
        let start = PathSelector::new(&forest).select(CategoryId(1));
        let next = start.select(CategoryId(5));
        assert_eq!(start.path().len(), 1);
        assert_eq!(next.path().len(), 2);
    }

    #[test]
    fn backtrack_out_of_range_is_rejected() {
        let forest = forest();
        let selector = PathSelector::new(&forest).select(CategoryId(1));
        assert_eq!(
            selector.backtrack(1).unwrap_err(),
            DomainError::InvalidPathIndex { index: 1, len: 1 }
        );
    }

    #[test]
    fn leaf_and_unresolved_paths_yield_empty_level() {
        let forest = forest();
        let leaf = PathSelector::with_path(&forest, SelectionPath::from(vec![1, 2, 3]));
        assert!(leaf.current_level().is_empty());

        // 3 exists but is not a root
        let skipped = PathSelector::with_path(&forest, SelectionPath::from(vec![3]));
        assert!(skipped.current_level().is_empty());
    }

    #[test]
    fn entries_carry_has_children_flag() {
        let forest = forest();
        let entries = PathSelector::new(&forest).select(CategoryId(1)).current_entries();
        let flags: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.has_children)).collect();
        assert_eq!(flags, vec![("Elves", true), ("Dwarfs", false)]);
    }

    #[test]
    fn empty_reseed_does_not_override_existing_path() {
        let forest = forest();
        let seeded = PathSelector::new(&forest).reseed(SelectionPath::from(vec![1, 2]));
        let after = seeded.reseed(SelectionPath::new());
        assert_eq!(after.path(), &SelectionPath::from(vec![1, 2]));
        assert!(seeded.clear().path().is_empty());
    }

    #[test]
    fn labels_resolve_along_path() {
        let forest = forest();
        let selector = PathSelector::with_path(&forest, SelectionPath::from(vec![1, 2, 99]));
        assert_eq!(selector.label_for(1), Some("Elves"));
        assert_eq!(selector.label_for(2), None);
        assert_eq!(selector.label_for(7), None);
        assert_eq!(selector.breadcrumb(), vec!["Armies", "Elves"]);
    }
}
