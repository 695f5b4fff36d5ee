//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{HierarchyService, TaggingService};
use crate::config::Settings;
use crate::infrastructure::store::TomlStore;
use crate::infrastructure::traits::{
    CategoryStore, FileSystem, RealFileSystem, Selector, SkimSelector, TagStore,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Interactive selector
    pub selector: Arc<dyn Selector>,

    /// Category hierarchy reads and mutations
    pub hierarchy: HierarchyService,

    /// Item tag loading and saving
    pub tagging: TaggingService,
}

impl ServiceContainer {
    /// Create a new service container backed by the configured TOML catalog.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(TomlStore::new(settings.data_file.clone(), fs));
        Self::with_deps(
            settings,
            store.clone(),
            store,
            Arc::new(SkimSelector),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        categories: Arc<dyn CategoryStore>,
        tags: Arc<dyn TagStore>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let hierarchy = HierarchyService::new(categories, settings.rules());
        let tagging = TaggingService::new(tags);

        Self {
            settings: Arc::new(settings),
            selector,
            hierarchy,
            tagging,
        }
    }
}
