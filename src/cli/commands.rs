//! Command dispatch: maps parsed CLI commands onto services.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::drill_down;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::global_config_path;
use crate::domain::{CategoryForest, CategoryId, PathSelector, PathSet, SelectionPath};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree) => cmd_tree(container),
        Some(Commands::List) => cmd_list(container),
        Some(Commands::Level { ids }) => cmd_level(container, ids),
        Some(Commands::Add { name, parent }) => cmd_add(container, name, *parent),
        Some(Commands::Rename { id, name }) => cmd_rename(container, *id, name),
        Some(Commands::Delete { id }) => cmd_delete(container, *id),
        Some(Commands::Select { path }) => cmd_select(container, path.clone()),
        Some(Commands::Tag {
            item,
            paths,
            interactive,
        }) => cmd_tag(container, item, paths, *interactive),
        Some(Commands::Paths { item }) => cmd_paths(container, item),
        Some(Commands::Config { command }) => cmd_config(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `catree --help`".to_string(),
        )),
    }
}

fn load_forest(container: &ServiceContainer) -> CliResult<CategoryForest> {
    let forest = container.hierarchy.load()?;
    if !forest.orphans().is_empty() {
        output::warning(&format!(
            "{} categories have no reachable parent and are hidden: {:?}",
            forest.orphans().len(),
            forest.orphans()
        ));
    }
    Ok(forest)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer) -> CliResult<()> {
    let forest = load_forest(container)?;
    if forest.is_empty() {
        output::info("No categories yet");
        return Ok(());
    }
    for tree in forest.to_display_trees() {
        print!("{}", tree);
    }
    output::detail(&format!(
        "{} categories, {} of {} levels used",
        forest.len(),
        forest.levels(),
        container.hierarchy.rules().max_depth
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer) -> CliResult<()> {
    for row in container.hierarchy.list_sorted()? {
        output::info(&format!("{:>5}  {}", row.id, row.name));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_level(container: &ServiceContainer, ids: &[CategoryId]) -> CliResult<()> {
    let forest = load_forest(container)?;
    let selector = PathSelector::with_path(&forest, ids.iter().copied().collect());

    let crumbs = selector.breadcrumb();
    if !crumbs.is_empty() {
        output::header(&crumbs.join(" > "));
    }
    let entries = selector.current_entries();
    if entries.is_empty() {
        output::info("No categories available at this level");
    }
    for entry in entries {
        output::detail(&format!(
            "{:>5}  {}",
            entry.id,
            output::category_label(&entry.name, entry.has_children)
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_add(container: &ServiceContainer, name: &str, parent: Option<CategoryId>) -> CliResult<()> {
    let id = container.hierarchy.create(name, parent)?;
    let kind = if parent.is_some() { "Subcategory" } else { "Category" };
    output::success(&format!("{kind} created: {} ({id})", name.trim()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_rename(container: &ServiceContainer, id: CategoryId, name: &str) -> CliResult<()> {
    container.hierarchy.rename(id, name)?;
    output::success(&format!("Category {id} renamed to {}", name.trim()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_delete(container: &ServiceContainer, id: CategoryId) -> CliResult<()> {
    let removed = container.hierarchy.delete(id)?;
    output::success(&format!("Category {id} and {} subcategories deleted", removed.len() - 1));
    for victim in removed {
        output::removed(&victim);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_select(container: &ServiceContainer, path: Option<SelectionPath>) -> CliResult<()> {
    let forest = load_forest(container)?;
    let initial = path.unwrap_or_default();
    match drill_down(&forest, container.selector.as_ref(), initial)? {
        Some(path) => {
            let names = PathSelector::with_path(&forest, path.clone()).breadcrumb();
            output::info(&path.ids().iter().map(|id| id.to_string()).collect::<Vec<_>>().join(","));
            output::detail(&names.join(" > "));
        }
        None => debug!("selection cancelled"),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tag(
    container: &ServiceContainer,
    item: &str,
    paths: &[SelectionPath],
    interactive: bool,
) -> CliResult<()> {
    let forest = load_forest(container)?;

    let set = if interactive {
        let mut set = container.tagging.load_paths(&forest, item)?;
        let slot = match set.add_slot() {
            Ok(slot) => slot,
            // Untagged items start with a single empty slot
            Err(_) => set.len() - 1,
        };
        let selector = set.selector(slot, &forest)?;
        let Some(path) = drill_down(&forest, container.selector.as_ref(), selector.into_path())?
        else {
            debug!("selection cancelled, item unchanged");
            return Ok(());
        };
        set.update(slot, path)?;
        set
    } else {
        for path in paths {
            let endpoint = path
                .endpoint()
                .ok_or_else(|| CliError::InvalidArgs("empty category path".to_string()))?;
            if forest.path_to(endpoint).as_ref() != Some(path) {
                return Err(CliError::InvalidArgs(format!(
                    "{path} is not a path from a root category"
                )));
            }
        }
        PathSet::from_paths(paths.to_vec())
    };

    let ids = container.tagging.save_paths(item, &set)?;
    output::success(&format!("{item} tagged with {} categories", ids.len()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_paths(container: &ServiceContainer, item: &str) -> CliResult<()> {
    let forest = load_forest(container)?;
    let set = container.tagging.load_paths(&forest, item)?;
    if set.is_empty() {
        output::info(&format!("{item} has no categories"));
        return Ok(());
    }
    output::header(item);
    for path in set.slots() {
        let names = PathSelector::with_path(&forest, path.clone()).breadcrumb();
        output::detail(&format!("{path}  {}", names.join(" > ")));
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}
