//! Interactive drill-down through the forest with a [`Selector`].

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CategoryForest, CategoryId, LevelEntry, PathSelector, SelectionPath};
use crate::infrastructure::traits::{SelectionItem, Selector};

const BACK: &str = "<back>";
const DONE: &str = "<done>";

/// Walks the forest level by level until the user is done, reaches a node
/// without children, or cancels (`Ok(None)`).
#[instrument(level = "debug", skip(forest, selector))]
pub fn drill_down(
    forest: &CategoryForest,
    selector: &dyn Selector,
    initial: SelectionPath,
) -> ApplicationResult<Option<SelectionPath>> {
    let mut state = PathSelector::new(forest).reseed(initial);

    loop {
        let entries = state.current_entries();
        if entries.is_empty() {
            debug!(path = %state.path(), "no further options");
            return Ok(Some(state.into_path()));
        }

        let mut items: Vec<SelectionItem> = entries.iter().map(entry_item).collect();
        if !state.path().is_empty() {
            items.push(SelectionItem {
                display: "◂ back".to_string(),
                value: BACK.to_string(),
            });
            items.push(SelectionItem {
                display: "✓ done".to_string(),
                value: DONE.to_string(),
            });
        }

        let prompt = prompt_for(&state);
        let choice = selector
            .select_one(&items, &prompt)
            .map_err(|e| ApplicationError::OperationFailed {
                context: "interactive selection".to_string(),
                source: e.into(),
            })?;

        let Some(choice) = choice else {
            return Ok(None);
        };
        state = match choice.value.as_str() {
            DONE => return Ok(Some(state.into_path())),
            BACK if state.path().len() > 1 => state.backtrack(state.path().len() - 2)?,
            BACK => state.clear(),
            value => {
                let id = value.parse::<CategoryId>().map_err(|e| {
                    ApplicationError::OperationFailed {
                        context: format!("selected value '{value}' is not a category id"),
                        source: Box::new(e),
                    }
                })?;
                state.select(id)
            }
        };
    }
}

fn entry_item(entry: &LevelEntry) -> SelectionItem {
    let display = if entry.has_children {
        format!("{} ▸", entry.name)
    } else {
        entry.name.clone()
    };
    SelectionItem {
        display,
        value: entry.id.to_string(),
    }
}

fn prompt_for(state: &PathSelector<'_>) -> String {
    let crumbs = state.breadcrumb();
    if crumbs.is_empty() {
        "category> ".to_string()
    } else {
        format!("{} > ", crumbs.join(" > "))
    }
}
