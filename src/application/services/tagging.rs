//! Content item tagging
//!
//! Converts between an item's stored category id set and the editable
//! [`PathSet`] used while the item is open for editing.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{CategoryForest, CategoryId, PathSet};
use crate::infrastructure::traits::TagStore;

pub struct TaggingService {
    store: Arc<dyn TagStore>,
}

impl TaggingService {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// Stored ids of `item`, as reconstructed paths (one empty slot when untagged).
    #[instrument(level = "debug", skip(self, forest))]
    pub fn load_paths(&self, forest: &CategoryForest, item: &str) -> ApplicationResult<PathSet> {
        let ids = self.stored_ids(item)?;
        let set = PathSet::from_ids(forest, ids);
        debug!(slots = set.len(), "loaded item paths");
        Ok(set)
    }

    /// Persist the union of all slot ids for `item`.
    #[instrument(level = "debug", skip(self, paths))]
    pub fn save_paths(&self, item: &str, paths: &PathSet) -> ApplicationResult<Vec<CategoryId>> {
        let ids = paths.flatten_ids();
        self.store
            .set_categories(item, &ids)
            .with_context(|| format!("save categories of '{item}'"))?;
        Ok(ids)
    }

    pub fn stored_ids(&self, item: &str) -> ApplicationResult<Vec<CategoryId>> {
        self.store
            .categories_for(item)
            .with_context(|| format!("load categories of '{item}'"))
    }
}
