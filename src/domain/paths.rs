//! Multi-path editing: one selection path per slot, aggregated into a tag set.

use itertools::Itertools;

use crate::domain::arena::CategoryForest;
use crate::domain::entities::{CategoryId, SelectionPath};
use crate::domain::error::DomainError;
use crate::domain::reconstruct::PathReconstructor;
use crate::domain::selector::PathSelector;

/// The category paths a content item carries while it is being edited.
///
/// Always holds at least one slot; a fresh set has a single empty slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    slots: Vec<SelectionPath>,
}

impl Default for PathSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSet {
    pub fn new() -> Self {
        Self {
            slots: vec![SelectionPath::new()],
        }
    }

    pub fn from_paths(paths: Vec<SelectionPath>) -> Self {
        if paths.is_empty() {
            Self::new()
        } else {
            Self { slots: paths }
        }
    }

    /// Seeds one slot per reconstructed path of a stored id set.
    pub fn from_ids<I>(forest: &CategoryForest, ids: I) -> Self
    where
        I: IntoIterator<Item = CategoryId>,
    {
        Self::from_paths(PathReconstructor::new(forest).reconstruct(ids))
    }

    pub fn slots(&self) -> &[SelectionPath] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(SelectionPath::is_empty)
    }

    /// Appends an empty slot; the last slot must already hold a selection.
    pub fn add_slot(&mut self) -> Result<usize, DomainError> {
        if self.slots.last().map_or(true, SelectionPath::is_empty) {
            return Err(DomainError::EmptyTrailingPath);
        }
        self.slots.push(SelectionPath::new());
        Ok(self.slots.len() - 1)
    }

    /// Removes a slot; the last remaining slot is kept.
    pub fn remove_slot(&mut self, index: usize) -> Result<(), DomainError> {
        self.check(index)?;
        if self.slots.len() > 1 {
            self.slots.remove(index);
        }
        Ok(())
    }

    /// Records a slot's new path. Returns `false` when nothing changed.
    pub fn update(&mut self, index: usize, path: SelectionPath) -> Result<bool, DomainError> {
        self.check(index)?;
        if self.slots[index] == path {
            return Ok(false);
        }
        self.slots[index] = path;
        Ok(true)
    }

    /// Selector seeded with the slot's current path.
    pub fn selector<'a>(
        &self,
        index: usize,
        forest: &'a CategoryForest,
    ) -> Result<PathSelector<'a>, DomainError> {
        self.check(index)?;
        Ok(PathSelector::new(forest).reseed(self.slots[index].clone()))
    }

    /// Stores the path a selector reached back into its slot.
    pub fn apply(&mut self, index: usize, selector: &PathSelector<'_>) -> Result<bool, DomainError> {
        self.update(index, selector.path().clone())
    }

    /// Union of all slot ids, first-seen order: the item's persisted tag set.
    pub fn flatten_ids(&self) -> Vec<CategoryId> {
        self.slots
            .iter()
            .flat_map(|p| p.ids().iter().copied())
            .unique()
            .collect()
    }

    fn check(&self, index: usize) -> Result<(), DomainError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(DomainError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            })
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
            CategoryRow::new(4, "Dwarfs", Some(1)),
        ])
    }

    #[test]
    fn new_set_has_one_empty_slot() {
        let set = PathSet::new();
        assert_eq!(set.len(), 1);
        assert!(set.is_empty());
        assert_eq!(PathSet::from_paths(vec![]), set);
    }

    #[test]
    fn cannot_add_slot_after_empty_one() {
        let mut set = PathSet::new();
        assert_eq!(set.add_slot(), Err(DomainError::EmptyTrailingPath));

        set.update(0, SelectionPath::from(vec![1])).unwrap();
        assert_eq!(set.add_slot(), Ok(1));
    }

    #[test]
    fn last_slot_is_never_removed() {
        let mut set = PathSet::new();
        set.remove_slot(0).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.remove_slot(3).is_err());
    }

    #[test]
    fn update_reports_unchanged_paths() {
        let mut set = PathSet::new();
        assert!(set.update(0, SelectionPath::from(vec![1])).unwrap());
        assert!(!set.update(0, SelectionPath::from(vec![1])).unwrap());
    }

    #[test]
    fn selector_round_trip_updates_slot() {
        let forest = forest();
        let mut set = PathSet::from_paths(vec![SelectionPath::from(vec![1, 2])]);

        let selector = set.selector(0, &forest).unwrap().select(CategoryId(3));
        assert!(set.apply(0, &selector).unwrap());

        assert_eq!(set.slots()[0], SelectionPath::from(vec![1, 2, 3]));
    }

    #[test]
    fn flatten_then_reconstruct_restores_slots() {
        let forest = forest();
        let set = PathSet::from_paths(vec![
            SelectionPath::from(vec![1, 2, 3]),
            SelectionPath::from(vec![1, 4]),
        ]);

        let ids = set.flatten_ids();
        assert_eq!(ids, vec![CategoryId(1), CategoryId(2), CategoryId(3), CategoryId(4)]);

        assert_eq!(PathSet::from_ids(&forest, ids), set);
    }
}
