//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{CategoryId, SelectionPath};

/// Depth-limited category hierarchies: browse, tag and edit a category tree
#[derive(Parser, Debug)]
#[command(name = "catree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Catalog file (default: from settings)
    #[arg(short = 'f', long, global = true, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// Directory with a local .catree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the category forest as a tree
    Tree,

    /// List all categories sorted by name
    List,

    /// Show selectable categories below a path
    Level {
        /// Path of category ids from a root, e.g. `1 2`
        ids: Vec<CategoryId>,
    },

    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Parent category id (omit for a root category)
        #[arg(short, long)]
        parent: Option<CategoryId>,
    },

    /// Rename a category
    Rename {
        /// Category id
        id: CategoryId,
        /// New name
        name: String,
    },

    /// Delete a category and all its subcategories
    Delete {
        /// Category id
        id: CategoryId,
    },

    /// Drill down interactively and print the chosen path
    Select {
        /// Start from this path, e.g. `1,2`
        #[arg(long)]
        path: Option<SelectionPath>,
    },

    /// Set the category paths of a content item
    Tag {
        /// Content item key
        item: String,
        /// Category path, e.g. `1,2,3` (repeatable)
        #[arg(short, long = "path")]
        paths: Vec<SelectionPath>,
        /// Add one more path to the item interactively
        #[arg(short, long, conflicts_with = "paths")]
        interactive: bool,
    },

    /// Show the category paths of a content item
    Paths {
        /// Content item key
        item: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings
    Show,
    /// Print the global config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_paths() {
        let cli = Cli::parse_from(["catree", "tag", "post-1", "-p", "1,2", "--path", "3"]);
        match cli.command {
            Some(Commands::Tag { item, paths, .. }) => {
                assert_eq!(item, "post-1");
                assert_eq!(paths, vec![SelectionPath::from(vec![1, 2]), SelectionPath::from(vec![3])]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
