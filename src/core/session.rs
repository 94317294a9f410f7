//! A working session: the store, its storage and the current view settings
//!
//! Both the one-shot commands and the interactive shell go through a
//! [`Session`], so save/restore/import behave the same everywhere.

use std::path::Path;

use tracing::{debug, info};

use crate::core::dirty::status_message;
use crate::core::error::InventoryError;
use crate::core::events::{ChangeNotifier, EventKind, Payload, PersistKind};
use crate::core::interchange::{self, RowError};
use crate::core::query::{run_query, QuerySpec, ViewSummary};
use crate::core::storage::{LoadProblem, Persistence};
use crate::core::store::ItemStore;
use crate::core::theme::Theme;
use crate::entities::item::InventoryItem;

/// Answer to the "unsaved changes" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    SaveAndQuit,
    DiscardAndQuit,
    Cancel,
}

/// What the caller should do after a quit request
#[derive(Debug)]
pub enum QuitOutcome {
    Quit,
    Stay,
    /// Save&Quit was chosen but saving failed; the session keeps running
    SaveFailed(InventoryError),
}

/// Result of a CSV import into the store
#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows_processed: usize,
    pub imported: usize,
    pub new_locations: Vec<String>,
    pub rejected: Vec<RowError>,
}

/// Store plus persistence plus view state
pub struct Session<P: Persistence> {
    store: ItemStore,
    storage: P,
    query: QuerySpec,
    theme: Theme,
    load_problems: Vec<LoadProblem>,
}

impl<P: Persistence> Session<P> {
    /// Load both collections from `storage`; the session starts clean
    pub fn open(storage: P, notifier: ChangeNotifier) -> Self {
        let items = storage.load_items();
        let locations = storage.load_locations();
        debug!(
            items = items.values.len(),
            locations = locations.values.len(),
            "session opened"
        );
        let load_problems = items.problem.into_iter().chain(locations.problem).collect();
        Self {
            store: ItemStore::from_parts(items.values, locations.values, notifier),
            storage,
            query: QuerySpec::default(),
            theme: Theme::default(),
            load_problems,
        }
    }

    /// Data files that existed but were ignored by the last load
    pub fn load_problems(&self) -> &[LoadProblem] {
        &self.load_problems
    }

    /// Fail if the last load ignored a data file, so a write cannot silently
    /// replace records that are still on disk
    pub fn ensure_clean_load(&self) -> Result<(), InventoryError> {
        match self.load_problems.first() {
            Some(problem) => Err(InventoryError::DegradedLoad {
                path: problem.path.clone(),
                message: problem.message.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn with_query(mut self, query: QuerySpec) -> Self {
        self.query = query;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ItemStore {
        &mut self.store
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        self.store.notifier()
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// Replace the view settings; observers of the view are told to refresh
    pub fn set_query(&mut self, query: QuerySpec) {
        if self.query != query {
            self.query = query;
            self.notifier()
                .publish(EventKind::InventoryChanged, Payload::None);
        }
    }

    /// Items of the current view, in display order
    pub fn view(&self) -> Vec<&InventoryItem> {
        run_query(self.store.items(), &self.query)
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            shown: self.view().len(),
            total: self.store.len(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        theme.apply();
        self.notifier()
            .publish(EventKind::ThemeChanged, Payload::Theme(theme.to_string()));
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.has_unsaved_changes()
    }

    /// Status text with the unsaved marker appended when dirty
    pub fn status_line(&self, message: &str) -> String {
        status_message(message, self.has_unsaved_changes())
    }

    /// Write both collections. On failure memory is left untouched and the
    /// session stays dirty.
    pub fn save(&mut self) -> Result<(), InventoryError> {
        for problem in &self.load_problems {
            self.storage.preserve(problem)?;
        }
        self.load_problems.clear();

        self.storage.save_items(self.store.items())?;
        self.storage.save_locations(self.store.locations())?;
        info!(
            items = self.store.len(),
            locations = self.store.locations().len(),
            "saved inventory"
        );

        self.store.mark_saved();
        self.notifier().publish(
            EventKind::DataPersisted,
            Payload::Persisted(PersistKind::Saved),
        );
        Ok(())
    }

    /// Discard memory and reload both collections from storage
    pub fn restore(&mut self) {
        let items = self.storage.load_items();
        let locations = self.storage.load_locations();
        info!(
            items = items.values.len(),
            locations = locations.values.len(),
            "restored inventory"
        );

        self.load_problems = items.problem.into_iter().chain(locations.problem).collect();
        self.store.replace_all(items.values, locations.values);
        self.notifier().publish(
            EventKind::DataPersisted,
            Payload::Persisted(PersistKind::Restored),
        );
    }

    /// Append the rows of a CSV file to the store
    pub fn import_csv(&mut self, path: &Path, skip_errors: bool) -> Result<ImportReport, InventoryError> {
        let parsed = interchange::import_file(path, skip_errors)?;
        let summary = self.store.import_items(parsed.drafts, &parsed.locations)?;
        info!(path = %path.display(), imported = summary.ids.len(), "imported CSV");

        Ok(ImportReport {
            rows_processed: parsed.rows_processed,
            imported: summary.ids.len(),
            new_locations: summary.new_locations,
            rejected: parsed.rejected,
        })
    }

    /// Write every item (in store order) to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<usize, InventoryError> {
        let count = interchange::export_file(path, self.store.items())?;
        info!(path = %path.display(), count, "exported CSV");
        Ok(count)
    }

    /// Run the quit protocol. `prompt` is only asked when there are unsaved
    /// changes.
    pub fn request_quit<F>(&mut self, prompt: F) -> QuitOutcome
    where
        F: FnOnce() -> QuitChoice,
    {
        if !self.has_unsaved_changes() {
            return QuitOutcome::Quit;
        }
        match prompt() {
            QuitChoice::Cancel => QuitOutcome::Stay,
            QuitChoice::DiscardAndQuit => QuitOutcome::Quit,
            QuitChoice::SaveAndQuit => match self.save() {
                Ok(()) => QuitOutcome::Quit,
                Err(e) => QuitOutcome::SaveFailed(e),
            },
        }
    }
}
