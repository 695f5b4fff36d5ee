//! Domain entities: core data structures

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CategoryId)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        CategoryId(value)
    }
}

/// Persisted shape of a category: one row per node, any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

impl CategoryRow {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, parent_id: Option<u64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(CategoryId),
        }
    }
}

/// Ordered ids from a root down to some node (not necessarily a leaf).
///
/// One path is one category tag applied to a content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionPath(Vec<CategoryId>);

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[CategoryId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deepest id of the path.
    pub fn endpoint(&self) -> Option<CategoryId> {
        self.0.last().copied()
    }

    pub fn push(&mut self, id: CategoryId) {
        self.0.push(id);
    }

    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Identity used to de-duplicate paths, e.g. `1-2-3`.
    pub fn key(&self) -> String {
        self.0.iter().join("-")
    }
}

impl fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

impl From<Vec<CategoryId>> for SelectionPath {
    fn from(ids: Vec<CategoryId>) -> Self {
        Self(ids)
    }
}

impl From<Vec<u64>> for SelectionPath {
    fn from(ids: Vec<u64>) -> Self {
        Self(ids.into_iter().map(CategoryId).collect())
    }
}

impl FromIterator<CategoryId> for SelectionPath {
    fn from_iter<T: IntoIterator<Item = CategoryId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for SelectionPath {
    type Err = ParseIntError;

    /// Parses a comma-separated id list such as `1,2,3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(CategoryId::from_str)
            .collect()
    }
}

impl<'a> IntoIterator for &'a SelectionPath {
    type Item = &'a CategoryId;
    type IntoIter = std::slice::Iter<'a, CategoryId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One selectable child at the current drill-down level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub id: CategoryId,
    pub name: String,
    /// Whether selecting this entry leads to further options
    pub has_children: bool,
}

/// Comparison key for the global name-uniqueness rule.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
