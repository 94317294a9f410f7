//! `inv shell` command - interactive session
//!
//! A menu loop over one [`Session`]. Two observers sit on the session's
//! notifier: [`TableView`] goes stale whenever the items, the locations or
//! the persisted state change and is redrawn before the next prompt;
//! [`StatusBar`] tracks the unsaved flag and the theme for the status line.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use console::style;
use miette::Result;
use tracing::debug;

use crate::cli::commands::utils::print_items;
use crate::cli::helpers::{load_config, open_session};
use crate::cli::table::{TableFormatter, TableRow, DEFAULT_COLUMNS, ITEM_COLUMNS};
use crate::cli::wizard::{ItemWizard, LocationChoice};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::query::{find_by_inventory_number, find_by_name};
use crate::core::{
    status_message, ChangeNotifier, Event, EventKind, InventoryError, Observer, ObserverError,
    Payload, Persistence, QuitOutcome, RemoveOutcome, Session, Theme, UpdateOutcome,
};

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    /// Start with this theme instead of the configured one (color, plain)
    #[arg(long)]
    pub theme: Option<Theme>,
}

/// Redraw flag for the item table
#[derive(Debug, Default)]
pub struct TableView {
    stale: Cell<bool>,
}

impl TableView {
    /// Subscribe a new view to every event that changes what it shows
    pub fn attach(notifier: &ChangeNotifier) -> Rc<Self> {
        let view = Rc::new(Self::default());
        for kind in [
            EventKind::InventoryChanged,
            EventKind::LocationsChanged,
            EventKind::DataPersisted,
        ] {
            let observer: Rc<dyn Observer> = view.clone();
            notifier.subscribe(kind, observer);
        }
        view
    }

    pub fn mark_stale(&self) {
        self.stale.set(true);
    }

    /// Whether a redraw is due; clears the flag
    pub fn take_stale(&self) -> bool {
        self.stale.replace(false)
    }

    pub fn render<P: Persistence>(&self, session: &Session<P>) {
        let items = session.view();
        println!();
        if items.is_empty() {
            println!("{}", style("(no items)").dim());
        } else {
            TableFormatter::new(ITEM_COLUMNS).without_summary().output(
                items.iter().map(|i| TableRow::from_item(i)),
                OutputFormat::Tsv,
                DEFAULT_COLUMNS,
            );
        }
        if session.query().is_filtered() {
            println!("{} {}", style(session.summary()).dim(), style("(filtered)").yellow());
        } else {
            println!("{}", style(session.summary()).dim());
        }
    }
}

impl Observer for TableView {
    fn notify(&self, event: &Event) -> Result<(), ObserverError> {
        debug!(kind = %event.kind, "table view stale");
        self.stale.set(true);
        Ok(())
    }
}

/// Status line state
#[derive(Debug)]
pub struct StatusBar {
    message: RefCell<String>,
    dirty: Cell<bool>,
    theme: Cell<Theme>,
}

impl StatusBar {
    pub fn attach(notifier: &ChangeNotifier, theme: Theme, dirty: bool) -> Rc<Self> {
        let bar = Rc::new(Self {
            message: RefCell::new("Ready".to_string()),
            dirty: Cell::new(dirty),
            theme: Cell::new(theme),
        });
        for kind in [EventKind::UnsavedFlagChanged, EventKind::ThemeChanged] {
            let observer: Rc<dyn Observer> = bar.clone();
            notifier.subscribe(kind, observer);
        }
        bar
    }

    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.borrow_mut() = message.into();
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn render(&self) -> String {
        status_message(&self.message.borrow(), self.dirty.get())
    }
}

impl Observer for StatusBar {
    fn notify(&self, event: &Event) -> Result<(), ObserverError> {
        match &event.payload {
            Payload::Unsaved(dirty) => self.dirty.set(*dirty),
            Payload::Theme(name) => self.theme.set(name.parse::<Theme>()?),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Add,
    Edit,
    Delete,
    SortFilter,
    ClearFilter,
    FindName,
    FindNumber,
    AddLocation,
    RemoveLocation,
    Import,
    Export,
    Save,
    Restore,
    ToggleTheme,
    Quit,
}

impl Action {
    const MENU: [Action; 16] = [
        Action::List,
        Action::Add,
        Action::Edit,
        Action::Delete,
        Action::SortFilter,
        Action::ClearFilter,
        Action::FindName,
        Action::FindNumber,
        Action::AddLocation,
        Action::RemoveLocation,
        Action::Import,
        Action::Export,
        Action::Save,
        Action::Restore,
        Action::ToggleTheme,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::List => "List items",
            Action::Add => "Add item",
            Action::Edit => "Edit item",
            Action::Delete => "Delete item",
            Action::SortFilter => "Sort / filter",
            Action::ClearFilter => "Clear filter",
            Action::FindName => "Find by name",
            Action::FindNumber => "Find by inventory number",
            Action::AddLocation => "Add location",
            Action::RemoveLocation => "Remove location",
            Action::Import => "Import CSV",
            Action::Export => "Export CSV",
            Action::Save => "Save",
            Action::Restore => "Restore from disk",
            Action::ToggleTheme => "Toggle theme",
            Action::Quit => "Quit",
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(args: ShellArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = open_session(&load_config(global));
    session.theme().apply();

    let table = TableView::attach(session.notifier());
    let status = StatusBar::attach(session.notifier(), session.theme(), session.has_unsaved_changes());
    if let Some(theme) = args.theme {
        session.set_theme(theme);
    }

    let wizard = ItemWizard::new();
    let menu: Vec<String> = Action::MENU.iter().map(|a| a.label().to_string()).collect();

    for problem in session.load_problems() {
        eprintln!(
            "{} {} could not be loaded ({}); a .bak copy is kept when you save",
            style("!").yellow(),
            problem.path.display(),
            problem.message
        );
    }
    status.set_message(format!(
        "Loaded {} item(s) from {}",
        session.store().len(),
        session.storage().items_path().display()
    ));
    table.mark_stale();

    loop {
        if table.take_stale() {
            table.render(&session);
        }
        println!();
        println!("{}", style(status.render()).italic());

        let action = match wizard.pick("Action", &menu)? {
            Some(idx) => Action::MENU[idx],
            None => Action::Quit,
        };

        match perform(action, &mut session, &wizard, &table, &status) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                eprintln!("{} {}", style("✗").red(), e);
                status.set_message(format!("{} failed", action.label()));
            }
        }
    }

    Ok(())
}

fn perform<P: Persistence>(
    action: Action,
    session: &mut Session<P>,
    wizard: &ItemWizard,
    table: &TableView,
    status: &StatusBar,
) -> Result<Flow> {
    match action {
        Action::List => table.mark_stale(),

        Action::Add => {
            let (draft, location) = wizard.draft(session.store().locations())?;
            if !ensure_location(session, wizard, &location)? {
                status.set_message("Item not added");
                return Ok(Flow::Continue);
            }
            let id = session.store_mut().add_item(draft)?;
            status.set_message(format!("Added item {}", id));
        }

        Action::Edit => {
            let Some(id) = wizard.pick_item("Edit which item?", &session.view())? else {
                return Ok(Flow::Continue);
            };
            let item = session
                .store()
                .get(id)
                .cloned()
                .ok_or(InventoryError::NotFound(id))?;
            let (update, location) = wizard.update(&item, session.store().locations())?;
            if !ensure_location(session, wizard, &location)? {
                status.set_message("Item not changed");
                return Ok(Flow::Continue);
            }
            match session.store_mut().update_item(id, &update)? {
                UpdateOutcome::Changed => status.set_message(format!("Updated item {}", id)),
                UpdateOutcome::Unchanged => status.set_message(format!("No changes to item {}", id)),
            }
        }

        Action::Delete => {
            let Some(id) = wizard.pick_item("Delete which item?", &session.view())? else {
                return Ok(Flow::Continue);
            };
            let label = session
                .store()
                .get(id)
                .map(|i| i.to_string())
                .unwrap_or_else(|| id.to_string());
            if !wizard.confirm(&format!("Delete {}?", label), false)? {
                return Ok(Flow::Continue);
            }
            match session.store_mut().delete_item(id) {
                RemoveOutcome::Removed(item) => status.set_message(format!("Deleted item {} ({})", item.id, item.name)),
                RemoveOutcome::NotFound => status.set_message(format!("Item {} was already gone", id)),
            }
        }

        Action::SortFilter => {
            let query = wizard.query(session.query(), session.store().locations())?;
            session.set_query(query);
            status.set_message(session.summary().to_string());
        }

        Action::ClearFilter => {
            let mut query = session.query().clone();
            query.clear_filters();
            session.set_query(query);
            status.set_message("Filter cleared");
        }

        Action::FindName | Action::FindNumber => {
            let by_name = action == Action::FindName;
            let prompt = if by_name { "Name contains" } else { "Inventory number contains" };
            let pattern = wizard.text(prompt, "", true)?;
            let items = session.store().items();
            let found = if by_name {
                find_by_name(items, &pattern)
            } else {
                find_by_inventory_number(items, &pattern)
            };
            println!();
            if found.is_empty() {
                println!("No items matching '{}'.", pattern);
            } else {
                print_items(&found, OutputFormat::Tsv, DEFAULT_COLUMNS, true)?;
            }
            status.set_message(format!("{} match(es) for '{}'", found.len(), pattern));
        }

        Action::AddLocation => {
            let name = wizard.text("Location name", "", true)?;
            session.store_mut().add_location(&name)?;
            status.set_message(format!("Added location {}", name));
        }

        Action::RemoveLocation => {
            let locations = session.store().locations().to_vec();
            let Some(idx) = wizard.pick("Remove which location?", &locations)? else {
                return Ok(Flow::Continue);
            };
            let name = &locations[idx];
            let in_use = session.store().items_at_location(name);
            let prompt = if in_use > 0 {
                format!("{} item(s) are stored at '{}'. Remove it anyway?", in_use, name)
            } else {
                format!("Remove location '{}'?", name)
            };
            if !wizard.confirm(&prompt, false)? {
                return Ok(Flow::Continue);
            }
            if let RemoveOutcome::Removed(removed) = session.store_mut().remove_location(name) {
                status.set_message(format!("Removed location {}", removed));
            }
        }

        Action::Import => {
            let path = PathBuf::from(wizard.text("CSV file to import", "", true)?);
            let skip_errors = wizard.confirm("Skip invalid rows?", false)?;
            let report = session.import_csv(&path, skip_errors)?;
            for err in &report.rejected {
                eprintln!("{} Row {}: {}", style("✗").red(), err.row, err.message);
            }
            status.set_message(format!(
                "Imported {} of {} row(s) from {}",
                report.imported,
                report.rows_processed,
                path.display()
            ));
        }

        Action::Export => {
            let path = PathBuf::from(wizard.text("Export to", "inventory_export.csv", true)?);
            let count = session.export_csv(&path)?;
            status.set_message(format!("Exported {} item(s) to {}", count, path.display()));
        }

        Action::Save => {
            session.save()?;
            status.set_message("Saved");
        }

        Action::Restore => {
            if session.has_unsaved_changes()
                && !wizard.confirm("Discard unsaved changes and reload from disk?", false)?
            {
                return Ok(Flow::Continue);
            }
            session.restore();
            status.set_message(format!("Restored {} item(s)", session.store().len()));
        }

        Action::ToggleTheme => {
            let theme = session.toggle_theme();
            status.set_message(format!("Theme: {}", theme));
        }

        Action::Quit => {
            return match session.request_quit(|| wizard.quit_choice()) {
                QuitOutcome::Quit => Ok(Flow::Quit),
                QuitOutcome::Stay => Ok(Flow::Continue),
                QuitOutcome::SaveFailed(e) => Err(e.into()),
            };
        }
    }
    Ok(Flow::Continue)
}

/// Add a location typed into the wizard after confirming; `false` if the
/// user declined
fn ensure_location<P: Persistence>(
    session: &mut Session<P>,
    wizard: &ItemWizard,
    choice: &LocationChoice,
) -> Result<bool> {
    let LocationChoice::New(name) = choice else {
        return Ok(true);
    };
    if !wizard.confirm(&format!("Location '{}' does not exist. Add it?", name), true)? {
        return Ok(false);
    }
    session.store_mut().add_location(name)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JsonStorage, QuerySpec};
    use crate::entities::ItemDraft;
    use tempfile::tempdir;

    fn session(dir: &std::path::Path) -> Session<JsonStorage> {
        Session::open(JsonStorage::in_dir(dir), ChangeNotifier::new())
    }

    #[test]
    fn test_table_view_goes_stale_on_changes() {
        let tmp = tempdir().unwrap();
        let mut session = session(tmp.path());
        let view = TableView::attach(session.notifier());
        assert!(!view.take_stale());

        session
            .store_mut()
            .add_item(ItemDraft::new("A-1", "Widget"))
            .unwrap();
        assert!(view.take_stale());
        assert!(!view.take_stale());

        session.store_mut().add_location("Shelf1").unwrap();
        assert!(view.take_stale());

        session.save().unwrap();
        assert!(view.take_stale());

        session.set_query(QuerySpec {
            text_filter: "wid".to_string(),
            ..Default::default()
        });
        assert!(view.take_stale());
    }

    #[test]
    fn test_status_bar_tracks_unsaved_flag() {
        let tmp = tempdir().unwrap();
        let mut session = session(tmp.path());
        let bar = StatusBar::attach(session.notifier(), Theme::Color, false);
        bar.set_message("Ready");
        assert_eq!(bar.render(), "Ready");

        session.store_mut().add_location("Shelf1").unwrap();
        assert_eq!(bar.render(), "Ready [* unsaved changes]");

        session.save().unwrap();
        assert_eq!(bar.render(), "Ready");
    }

    #[test]
    fn test_status_bar_follows_theme() {
        let tmp = tempdir().unwrap();
        let mut session = session(tmp.path()).with_theme(Theme::Color);
        let bar = StatusBar::attach(session.notifier(), Theme::Color, false);

        session.toggle_theme();
        assert_eq!(bar.theme(), Theme::Plain);
        session.toggle_theme();
        assert_eq!(bar.theme(), Theme::Color);
    }

    #[test]
    fn test_menu_labels_are_unique() {
        let mut labels: Vec<&str> = Action::MENU.iter().map(|a| a.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Action::MENU.len());
    }
}
