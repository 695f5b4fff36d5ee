//! Arena-backed category forest.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{CategoryId, SelectionPath};

/// Node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    /// Arena index of the parent, None for roots
    pub parent: Option<Index>,
    /// Arena indices of the children, in row order
    pub children: Vec<Index>,
    /// Number of ancestors; roots have depth 0
    pub depth: usize,
}

impl CategoryNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// All category trees of one deployment.
///
/// Nodes live in a generational arena and reference each other by arena
/// index. An `id -> index` map gives O(1) lookups for path selection,
/// reconstruction and label resolution. Built by [`TreeBuilder`], immutable
/// afterwards.
///
/// [`TreeBuilder`]: crate::domain::TreeBuilder
#[derive(Debug, Default)]
pub struct CategoryForest {
    arena: Arena<CategoryNode>,
    index: HashMap<CategoryId, Index>,
    roots: Vec<Index>,
    orphans: Vec<CategoryId>,
}

impl CategoryForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a node under `parent` (or as a root).
    ///
    /// Callers insert parents before children; the builder guarantees it.
    #[instrument(level = "trace", skip(self, name))]
    pub(crate) fn insert_node(
        &mut self,
        id: CategoryId,
        name: String,
        parent: Option<Index>,
    ) -> Index {
        let depth = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let idx = self.arena.insert(CategoryNode {
            id,
            name,
            parent,
            children: Vec::new(),
            depth,
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(idx),
            None => self.roots.push(idx),
        }
        self.index.insert(id, idx);
        idx
    }

    pub(crate) fn record_orphan(&mut self, id: CategoryId) {
        self.orphans.push(id);
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.index.get(&id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn node(&self, idx: Index) -> Option<&CategoryNode> {
        self.arena.get(idx)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Ids of rows that could not be attached to any root.
    pub fn orphans(&self) -> &[CategoryId] {
        &self.orphans
    }

    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> + '_ {
        self.roots.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub fn children<'a>(
        &'a self,
        node: &'a CategoryNode,
    ) -> impl Iterator<Item = &'a CategoryNode> + 'a {
        node.children.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub fn parent(&self, node: &CategoryNode) -> Option<&CategoryNode> {
        node.parent.and_then(|idx| self.arena.get(idx))
    }

    pub fn depth_of(&self, id: CategoryId) -> Option<usize> {
        self.get(id).map(|n| n.depth)
    }

    /// Root-first id chain ending at `id`.
    pub fn path_to(&self, id: CategoryId) -> Option<SelectionPath> {
        let mut current = self.get(id)?;
        let mut ids = vec![current.id];
        while let Some(parent) = self.parent(current) {
            ids.push(parent.id);
            current = parent;
        }
        ids.reverse();
        Some(SelectionPath::from(ids))
    }

    /// Number of levels in the deepest tree (0 for an empty forest).
    pub fn levels(&self) -> usize {
        self.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    /// Pre-order walk over every tree, roots in order.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.roots.iter().rev().copied().collect())
    }

    /// Renders each root as a printable tree.
    pub fn to_display_trees(&self) -> Vec<Tree<String>> {
        fn build(forest: &CategoryForest, node: &CategoryNode) -> Tree<String> {
            let leaves: Vec<_> = forest.children(node).map(|c| build(forest, c)).collect();
            Tree::new(node.to_string()).with_leaves(leaves)
        }

        self.roots().map(|root| build(self, root)).collect()
    }
}

pub struct PreOrderIterator<'a> {
    forest: &'a CategoryForest,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a CategoryForest, stack: Vec<Index>) -> Self {
        Self { forest, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.forest.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
