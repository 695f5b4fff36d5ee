//! Tree builder for turning flat parent-pointer rows into a forest.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::CategoryForest;
use crate::domain::entities::{CategoryId, CategoryRow};

/// Constructs the category forest from persisted rows.
///
/// Rows may arrive in any order. A row whose parent does not exist (and
/// everything below it) is dropped and recorded as an orphan.
pub struct TreeBuilder {
    relationship_cache: HashMap<CategoryId, Vec<usize>>,
    visited: HashSet<CategoryId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            relationship_cache: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    /// Builds the forest; pure function of `rows`.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build(&mut self, rows: &[CategoryRow]) -> CategoryForest {
        self.relationship_cache.clear();
        self.visited.clear();

        let mut forest = CategoryForest::new();
        let mut known: HashSet<CategoryId> = HashSet::with_capacity(rows.len());
        let mut root_rows = Vec::new();

        for (pos, row) in rows.iter().enumerate() {
            if !known.insert(row.id) {
                warn!(id = %row.id, name = %row.name, "duplicate category id, keeping first row");
                continue;
            }
            match row.parent_id {
                Some(parent) => self.relationship_cache.entry(parent).or_default().push(pos),
                None => root_rows.push(pos),
            }
        }

        for pos in root_rows {
            self.attach_subtree(&mut forest, rows, pos);
        }

        // Anything not reached from a root points at a missing parent or sits on a cycle
        for row in rows {
            if known.remove(&row.id) && !self.visited.contains(&row.id) {
                warn!(
                    id = %row.id,
                    name = %row.name,
                    parent_id = ?row.parent_id,
                    "structural inconsistency: category has no reachable parent, dropping"
                );
                forest.record_orphan(row.id);
            }
        }

        debug!(nodes = forest.len(), orphans = forest.orphans().len(), "forest built");
        forest
    }

    fn attach_subtree(&mut self, forest: &mut CategoryForest, rows: &[CategoryRow], root: usize) {
        let mut stack: Vec<(usize, Option<Index>)> = vec![(root, None)];

        while let Some((pos, parent_idx)) = stack.pop() {
            let row = &rows[pos];
            if !self.visited.insert(row.id) {
                continue;
            }
            let idx = forest.insert_node(row.id, row.name.clone(), parent_idx);

            if let Some(children) = self.relationship_cache.get(&row.id) {
                // Reverse so children pop in row order
                for &child in children.iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(forest: &CategoryForest) -> Vec<u64> {
        forest.iter().map(|n| n.id.0).collect()
    }

    #[test]
    fn builds_nested_forest_from_unordered_rows() {
        let rows = vec![
            CategoryRow::new(3, "High Elves", Some(2)),
            CategoryRow::new(1, "Armies", None),
            CategoryRow::new(2, "Elves", Some(1)),
            CategoryRow::new(4, "Terrain", None),
        ];

        let forest = TreeBuilder::new().build(&rows);

        let roots: Vec<_> = forest.roots().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["Armies", "Terrain"]);
        assert_eq!(ids(&forest), vec![1, 2, 3, 4]);
        assert_eq!(forest.depth_of(CategoryId(3)), Some(2));
        assert!(forest.orphans().is_empty());
    }

    #[test]
    fn drops_rows_with_missing_parent_and_their_descendants() {
        let rows = vec![
            CategoryRow::new(1, "Armies", None),
            CategoryRow::new(5, "Lost", Some(99)),
            CategoryRow::new(6, "Lost Child", Some(5)),
        ];

        let forest = TreeBuilder::new().build(&rows);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(forest.orphans(), &[CategoryId(5), CategoryId(6)]);
    }

    #[test]
    fn drops_rows_on_a_parent_cycle() {
        let rows = vec![
            CategoryRow::new(1, "A", Some(2)),
            CategoryRow::new(2, "B", Some(1)),
            CategoryRow::new(3, "Root", None),
        ];

        let forest = TreeBuilder::new().build(&rows);

        assert_eq!(ids(&forest), vec![3]);
        assert_eq!(forest.orphans().len(), 2);
    }

    #[test]
    fn keeps_first_row_for_duplicate_ids() {
        let rows = vec![
            CategoryRow::new(1, "First", None),
            CategoryRow::new(1, "Second", None),
        ];

        let forest = TreeBuilder::new().build(&rows);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(CategoryId(1)).unwrap().name, "First");
    }

    #[test]
    fn builder_is_reusable() {
        let mut builder = TreeBuilder::new();
        let first = builder.build(&[CategoryRow::new(1, "A", None)]);
        let second = builder.build(&[CategoryRow::new(1, "A", None)]);
        assert_eq!(first.len(), second.len());
    }
}
