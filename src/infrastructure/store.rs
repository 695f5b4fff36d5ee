//! Category and tag stores: a TOML document on disk and an in-memory twin.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{CategoryId, CategoryRow};
use crate::infrastructure::traits::{CategoryStore, FileSystem, TagStore};

/// Everything a catalog persists: category rows and item tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    /// Next id handed out by `insert`; ids are never reused
    pub next_id: u64,
    pub categories: Vec<CategoryRow>,
    pub items: BTreeMap<String, Vec<CategoryId>>,
}

impl CatalogDocument {
    pub fn with_rows(categories: Vec<CategoryRow>) -> Self {
        let next_id = categories.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        Self {
            next_id,
            categories,
            items: BTreeMap::new(),
        }
    }

    fn insert(&mut self, name: &str, parent_id: Option<CategoryId>) -> CategoryId {
        let floor = self.categories.iter().map(|r| r.id.0 + 1).max().unwrap_or(1);
        let id = CategoryId(self.next_id.max(floor));
        self.next_id = id.0 + 1;
        self.categories.push(CategoryRow {
            id,
            name: name.to_string(),
            parent_id,
        });
        id
    }

    fn rename(&mut self, id: CategoryId, name: &str) -> io::Result<()> {
        let row = self
            .categories
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        row.name = name.to_string();
        Ok(())
    }

    fn delete(&mut self, id: CategoryId) -> io::Result<()> {
        let pos = self
            .categories
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        self.categories.remove(pos);
        Ok(())
    }

    fn categories_for(&self, item: &str) -> Vec<CategoryId> {
        self.items.get(item).cloned().unwrap_or_default()
    }

    fn set_categories(&mut self, item: &str, ids: &[CategoryId]) {
        if ids.is_empty() {
            self.items.remove(item);
        } else {
            self.items.insert(item.to_string(), ids.to_vec());
        }
    }
}

fn not_found(id: CategoryId) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no category row with id {id}"))
}

fn poisoned<T>(_: PoisonError<T>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, "catalog lock poisoned")
}

/// Catalog persisted as one TOML file, re-read on every call.
pub struct TomlStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    write_lock: Mutex<()>,
}

impl TomlStore {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document; a missing file is an empty catalog.
    pub fn load(&self) -> io::Result<CatalogDocument> {
        if !self.fs.exists(&self.path) {
            return Ok(CatalogDocument::default());
        }
        let content = self.fs.read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("parse {}: {}", self.path.display(), e),
            )
        })
    }

    #[instrument(level = "trace", skip(self, doc), fields(path = %self.path.display()))]
    pub fn save(&self, doc: &CatalogDocument) -> io::Result<()> {
        let content = toml::to_string_pretty(doc)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.fs.write_atomic(&self.path, &content)
    }

    fn modify<T>(&self, f: impl FnOnce(&mut CatalogDocument) -> io::Result<T>) -> io::Result<T> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }
}

impl CategoryStore for TomlStore {
    fn rows(&self) -> io::Result<Vec<CategoryRow>> {
        Ok(self.load()?.categories)
    }

    fn insert_row(&self, name: &str, parent_id: Option<CategoryId>) -> io::Result<CategoryId> {
        let id = self.modify(|doc| Ok(doc.insert(name, parent_id)))?;
        debug!(%id, name, "inserted category row");
        Ok(id)
    }

    fn update_row(&self, id: CategoryId, name: &str) -> io::Result<()> {
        self.modify(|doc| doc.rename(id, name))
    }

    fn delete_row(&self, id: CategoryId) -> io::Result<()> {
        self.modify(|doc| doc.delete(id))
    }
}

impl TagStore for TomlStore {
    fn categories_for(&self, item: &str) -> io::Result<Vec<CategoryId>> {
        Ok(self.load()?.categories_for(item))
    }

    fn set_categories(&self, item: &str, ids: &[CategoryId]) -> io::Result<()> {
        self.modify(|doc| {
            doc.set_categories(item, ids);
            Ok(())
        })
    }
}

/// In-memory catalog, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RwLock<CatalogDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<CategoryRow>) -> Self {
        Self {
            doc: RwLock::new(CatalogDocument::with_rows(rows)),
        }
    }

    pub fn snapshot(&self) -> io::Result<CatalogDocument> {
        Ok(self.doc.read().map_err(poisoned)?.clone())
    }
}

impl CategoryStore for MemoryStore {
    fn rows(&self) -> io::Result<Vec<CategoryRow>> {
        Ok(self.doc.read().map_err(poisoned)?.categories.clone())
    }

    fn insert_row(&self, name: &str, parent_id: Option<CategoryId>) -> io::Result<CategoryId> {
        Ok(self.doc.write().map_err(poisoned)?.insert(name, parent_id))
    }

    fn update_row(&self, id: CategoryId, name: &str) -> io::Result<()> {
        self.doc.write().map_err(poisoned)?.rename(id, name)
    }

    fn delete_row(&self, id: CategoryId) -> io::Result<()> {
        self.doc.write().map_err(poisoned)?.delete(id)
    }
}

impl TagStore for MemoryStore {
    fn categories_for(&self, item: &str) -> io::Result<Vec<CategoryId>> {
        Ok(self.doc.read().map_err(poisoned)?.categories_for(item))
    }

    fn set_categories(&self, item: &str, ids: &[CategoryId]) -> io::Result<()> {
        self.doc.write().map_err(poisoned)?.set_categories(item, ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut doc = CatalogDocument::default();
        let a = doc.insert("Armies", None);
        let b = doc.insert("Elves", Some(a));
        doc.delete(b).unwrap();
        let c = doc.insert("Dwarfs", Some(a));
        assert_eq!((a.0, b.0, c.0), (1, 2, 3));
    }

    #[test]
    fn seeded_rows_push_next_id_past_existing() {
        let mut doc = CatalogDocument::with_rows(vec![CategoryRow::new(7, "Lore", None)]);
        assert_eq!(doc.insert("Maps", None), CategoryId(8));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut doc = CatalogDocument::default();
        assert_eq!(doc.delete(CategoryId(1)).unwrap_err().kind(), io::ErrorKind::NotFound);
        assert_eq!(
            doc.rename(CategoryId(1), "x").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn empty_tag_set_removes_item() {
        let mut doc = CatalogDocument::default();
        doc.set_categories("post", &[CategoryId(1)]);
        doc.set_categories("post", &[]);
        assert!(doc.items.is_empty());
    }
}
