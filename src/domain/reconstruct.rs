//! Rebuilding selection paths from a flat set of tagged ids.

use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::domain::arena::CategoryForest;
use crate::domain::entities::{CategoryId, SelectionPath};

/// Inverse of flattening an item's paths into an id set.
pub struct PathReconstructor<'a> {
    forest: &'a CategoryForest,
}

impl<'a> PathReconstructor<'a> {
    pub fn new(forest: &'a CategoryForest) -> Self {
        Self { forest }
    }

    /// Minimal root-to-node paths covering `selected`.
    ///
    /// An id becomes a path unless one of its direct children is selected too;
    /// ancestors are re-derived from the forest. Ids missing from the forest
    /// are dropped.
    pub fn reconstruct<I>(&self, selected: I) -> Vec<SelectionPath>
    where
        I: IntoIterator<Item = CategoryId>,
    {
        let selected: Vec<CategoryId> = selected
            .into_iter()
            .unique()
            .filter(|id| {
                let known = self.forest.contains(*id);
                if !known {
                    warn!(%id, "selected category has no ancestor chain, dropping");
                }
                known
            })
            .collect();

        // An id whose direct child is also selected is covered by the child's path
        let selected_set: HashSet<CategoryId> = selected.iter().copied().collect();
        let paths: Vec<SelectionPath> = selected
            .iter()
            .filter(|id| !self.has_selected_child(**id, &selected_set))
            .filter_map(|id| self.forest.path_to(*id))
            .unique_by(SelectionPath::key)
            .collect();

        debug!(
            selected = selected.len(),
            paths = paths.len(),
            "reconstructed selection paths"
        );
        paths
    }

    fn has_selected_child(&self, id: CategoryId, selected: &HashSet<CategoryId>) -> bool {
        self.forest
            .get(id)
            .is_some_and(|node| self.forest.children(node).any(|c| selected.contains(&c.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::entities::CategoryRow;
    use rstest::rstest;

    fn forest() -> CategoryForest {
        TreeBuilder::new().build(&[
            CategoryRow::new(1, "Armies", None),
            CategoryRow::new(2, "Elves", Some(1)),
            CategoryRow::new(3, "High Elves", Some(2)),
            CategoryRow::new(4, "Dwarfs", Some(1)),
            CategoryRow::new(5, "Terrain", None),
        ])
    }

    fn ids(raw: &[u64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId).collect()
    }

    #[rstest]
    #[case::empty(&[], vec![])]
    #[case::single_leaf(&[3], vec![vec![1, 2, 3]])]
    #[case::ancestor_dropped(&[2, 3], vec![vec![1, 2, 3]])]
    #[case::full_chain(&[1, 2, 3], vec![vec![1, 2, 3]])]
    #[case::gap_in_chain(&[1, 3], vec![vec![1], vec![1, 2, 3]])]
    #[case::two_branches(&[1, 2, 3, 4], vec![vec![1, 2, 3], vec![1, 4]])]
    #[case::separate_roots(&[5, 4], vec![vec![5], vec![1, 4]])]
    #[case::interior_node(&[2], vec![vec![1, 2]])]
    fn reconstructs_deepest_paths(#[case] selected: &[u64], #[case] expected: Vec<Vec<u64>>) {
        let forest = forest();
        let paths = PathReconstructor::new(&forest).reconstruct(ids(selected));
        let expected: Vec<SelectionPath> = expected.into_iter().map(SelectionPath::from).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let forest = forest();
        let paths = PathReconstructor::new(&forest).reconstruct(ids(&[42, 4]));
        assert_eq!(paths, vec![SelectionPath::from(vec![1, 4])]);
    }

    #[test]
    fn duplicate_ids_yield_one_path() {
        let forest = forest();
        let paths = PathReconstructor::new(&forest).reconstruct(ids(&[3, 3, 2]));
        assert_eq!(paths.len(), 1);
    }
}
