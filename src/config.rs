//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/catree/catree.toml`
//! 3. Local config: `<dir>/.catree.toml`
//! 4. Environment variables: `CATREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;
use crate::domain::rules::{HierarchyRules, DEFAULT_MAX_DEPTH, DEFAULT_MIN_NAME_LENGTH};

/// Limits applied to hierarchy mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Maximum number of levels, roots included (1 to 5)
    pub max_depth: usize,
    /// Minimum category name length after trimming
    pub min_name_length: usize,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_name_length: DEFAULT_MIN_NAME_LENGTH,
        }
    }
}

/// Raw hierarchy config: `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHierarchyConfig {
    pub max_depth: Option<usize>,
    pub min_name_length: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub hierarchy: RawHierarchyConfig,
}

/// Unified configuration for catree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Catalog file (default: ~/.catree/catalog.toml)
    pub data_file: PathBuf,
    /// Depth and naming rules
    pub hierarchy: HierarchyConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            hierarchy: HierarchyConfig::default(),
        }
    }
}

fn default_data_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".catree").join("catalog.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.catree/catalog.toml"))
}

/// Get the XDG config directory for catree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "catree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("catree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".catree.toml")
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Rules handed to the hierarchy service.
    pub fn rules(&self) -> HierarchyRules {
        HierarchyRules {
            max_depth: self.hierarchy.max_depth,
            min_name_length: self.hierarchy.min_name_length,
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            hierarchy: HierarchyConfig {
                max_depth: overlay
                    .hierarchy
                    .max_depth
                    .unwrap_or(self.hierarchy.max_depth),
                min_name_length: overlay
                    .hierarchy
                    .min_name_length
                    .unwrap_or(self.hierarchy.min_name_length),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.catree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply CATREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `CATREE_HIERARCHY__MAX_DEPTH=4`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CATREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_int("hierarchy.max_depth") {
            settings.hierarchy.max_depth = usize::try_from(val).map_err(|_| {
                ApplicationError::Config {
                    message: format!("hierarchy.max_depth must not be negative: {val}"),
                }
            })?;
        }
        if let Ok(val) = config.get_int("hierarchy.min_name_length") {
            settings.hierarchy.min_name_length = usize::try_from(val).map_err(|_| {
                ApplicationError::Config {
                    message: format!("hierarchy.min_name_length must not be negative: {val}"),
                }
            })?;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !(1..=DEFAULT_MAX_DEPTH).contains(&self.hierarchy.max_depth) {
            return Err(ApplicationError::Config {
                message: format!(
                    "hierarchy.max_depth must be between 1 and {DEFAULT_MAX_DEPTH}, got {}",
                    self.hierarchy.max_depth
                ),
            });
        }
        if self.hierarchy.min_name_length == 0 {
            return Err(ApplicationError::Config {
                message: "hierarchy.min_name_length must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Render settings as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hierarchy_rules() {
        let settings = Settings::default();
        assert_eq!(settings.rules(), HierarchyRules::default());
        assert!(settings.data_file.ends_with("catalog.toml"));
    }

    #[test]
    fn overlay_replaces_only_specified_fields() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str("[hierarchy]\nmax_depth = 3\n").unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.hierarchy.max_depth, 3);
        assert_eq!(merged.hierarchy.min_name_length, DEFAULT_MIN_NAME_LENGTH);
        assert_eq!(merged.data_file, base.data_file);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let mut settings = Settings::default();
        settings.hierarchy.max_depth = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn depth_above_five_is_rejected() {
        let mut settings = Settings::default();
        settings.hierarchy.max_depth = DEFAULT_MAX_DEPTH + 1;
        assert!(settings.validate().is_err());

        settings.hierarchy.max_depth = DEFAULT_MAX_DEPTH;
        assert!(settings.validate().is_ok());
    }
}
