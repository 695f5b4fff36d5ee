//! Category hierarchy service
//!
//! Loads the forest and validates create / rename / delete against the
//! latest persisted snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    cascade_order, CategoryForest, CategoryId, CategoryRow, HierarchyRules, TreeBuilder,
};
use crate::infrastructure::traits::CategoryStore;

/// Service for reading and mutating the category hierarchy.
///
/// Holds no state between calls besides the store handle. Mutations are
/// serialized so that two writers cannot both pass validation with
/// conflicting changes.
pub struct HierarchyService {
    store: Arc<dyn CategoryStore>,
    rules: HierarchyRules,
    write_lock: Mutex<()>,
}

impl HierarchyService {
    pub fn new(store: Arc<dyn CategoryStore>, rules: HierarchyRules) -> Self {
        Self {
            store,
            rules,
            write_lock: Mutex::new(()),
        }
    }

    pub fn rules(&self) -> HierarchyRules {
        self.rules
    }

    /// Build the forest from the current rows.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self) -> ApplicationResult<CategoryForest> {
        let rows = self.rows()?;
        Ok(TreeBuilder::new().build(&rows))
    }

    /// All rows ordered by name (case-insensitive), for flat listings.
    pub fn list_sorted(&self) -> ApplicationResult<Vec<CategoryRow>> {
        let mut rows = self.rows()?;
        rows.sort_by_cached_key(|r| r.name.to_lowercase());
        Ok(rows)
    }

    /// Create a category under `parent_id`, or a root when `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, name: &str, parent_id: Option<CategoryId>) -> ApplicationResult<CategoryId> {
        let _guard = self.lock();
        let rows = self.rows()?;

        // Placement first: a full branch rejects any name
        if let Some(parent) = parent_id {
            let forest = TreeBuilder::new().build(&rows);
            self.rules.check_parent(&forest, parent)?;
        }
        let name = self.rules.check_name(name, &rows, None)?;

        let id = self
            .store
            .insert_row(&name, parent_id)
            .with_context(|| format!("insert category '{name}'"))?;
        info!(%id, name = %name, parent_id = ?parent_id, "created category");
        Ok(id)
    }

    /// Rename a category; the new name must not clash with any other node.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&self, id: CategoryId, new_name: &str) -> ApplicationResult<()> {
        let _guard = self.lock();
        let rows = self.rows()?;
        if !rows.iter().any(|r| r.id == id) {
            return Err(ApplicationError::NotFound(id));
        }

        let name = self.rules.check_name(new_name, &rows, Some(id))?;
        self.store
            .update_row(id, &name)
            .with_context(|| format!("rename category {id}"))?;
        info!(%id, name = %name, "renamed category");
        Ok(())
    }

    /// Delete a category and its whole subtree, children before parents.
    ///
    /// Returns the removed ids in deletion order. If a row delete fails the
    /// remaining rows still form a consistent forest and the call can be
    /// repeated with the same id.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: CategoryId) -> ApplicationResult<Vec<CategoryId>> {
        let _guard = self.lock();
        let rows = self.rows()?;

        let order = cascade_order(&rows, id);
        if order.is_empty() {
            return Err(ApplicationError::NotFound(id));
        }

        for victim in &order {
            debug!(id = %victim, "deleting category row");
            self.store
                .delete_row(*victim)
                .with_context(|| format!("delete category {victim} (subtree of {id})"))?;
        }
        info!(%id, removed = order.len(), "deleted category subtree");
        Ok(order)
    }

    fn rows(&self) -> ApplicationResult<Vec<CategoryRow>> {
        self.store
            .rows()
            .with_context(|| "load category rows".to_string())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
