//! In-memory item store - the single owner of items and locations
//!
//! Every mutation follows the same order: change the collection, update the
//! unsaved flag, then publish the change. Observers therefore never see a
//! mutated store next to a stale flag.

use chrono::Utc;
use std::cmp::Ordering;
use tracing::debug;

use crate::core::dirty::DirtyTracker;
use crate::core::error::InventoryError;
use crate::core::events::{ChangeNotifier, EventKind, Payload};
use crate::entities::item::{InventoryItem, ItemDraft, ItemUpdate};

/// Result of an update that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Changed,
    Unchanged,
}

/// Result of a removal; a missing target is not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome<T> {
    Removed(T),
    NotFound,
}

impl<T> RemoveOutcome<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed(_))
    }
}

/// Summary of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Ids assigned to the imported items, in input order
    pub ids: Vec<u32>,
    /// Locations that were not known before
    pub new_locations: Vec<String>,
}

/// Owner of the item list and the location set
#[derive(Debug)]
pub struct ItemStore {
    items: Vec<InventoryItem>,
    locations: Vec<String>,
    /// Highest id ever handed out, so deleted ids are not reissued
    high_water: u32,
    notifier: ChangeNotifier,
    dirty: DirtyTracker,
}

/// Order used for the location list: case-insensitive, ordinal tie-break
pub fn compare_locations(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl ItemStore {
    /// Empty store
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), notifier)
    }

    /// Store seeded with loaded data; starts clean
    pub fn from_parts(
        items: Vec<InventoryItem>,
        locations: Vec<String>,
        notifier: ChangeNotifier,
    ) -> Self {
        let high_water = items.iter().map(|i| i.id).max().unwrap_or(0);
        Self {
            items,
            locations: normalize_locations(locations),
            high_water,
            dirty: DirtyTracker::new(notifier.clone()),
            notifier,
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Id the next added item will receive
    pub fn next_id(&self) -> Result<u32, InventoryError> {
        self.last_id().checked_add(1).ok_or_else(ids_exhausted)
    }

    fn last_id(&self) -> u32 {
        let max = self.items.iter().map(|i| i.id).max().unwrap_or(0);
        max.max(self.high_water)
    }

    /// Stored spelling of a location, matched case-insensitively
    pub fn find_location(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.locations
            .iter()
            .find(|l| l.to_lowercase() == wanted)
            .map(String::as_str)
    }

    pub fn has_location(&self, name: &str) -> bool {
        self.find_location(name).is_some()
    }

    /// Number of items whose location matches (case-insensitively)
    pub fn items_at_location(&self, name: &str) -> usize {
        let wanted = name.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| i.location.to_lowercase() == wanted)
            .count()
    }

    /// Validate and append a new item; returns its id
    pub fn add_item(&mut self, draft: ItemDraft) -> Result<u32, InventoryError> {
        let id = self.next_id()?;
        let item = draft.into_item(id, Utc::now())?;
        debug!(id, name = %item.name, "add item");

        self.items.push(item);
        self.high_water = id;
        self.dirty.mark_dirty();
        self.notifier
            .publish(EventKind::InventoryChanged, Payload::ItemAdded(id));
        Ok(id)
    }

    /// Apply the differing fields of `update` to item `id`
    pub fn update_item(
        &mut self,
        id: u32,
        update: &ItemUpdate,
    ) -> Result<UpdateOutcome, InventoryError> {
        let slot = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(InventoryError::NotFound(id))?;

        let next = match update.apply_to(slot, Utc::now())? {
            Some(next) => next,
            None => {
                debug!(id, "update without changes");
                return Ok(UpdateOutcome::Unchanged);
            }
        };

        *slot = next;
        debug!(id, "update item");
        self.dirty.mark_dirty();
        self.notifier
            .publish(EventKind::InventoryChanged, Payload::ItemUpdated(id));
        Ok(UpdateOutcome::Changed)
    }

    /// Remove item `id` if it is still present
    pub fn delete_item(&mut self, id: u32) -> RemoveOutcome<InventoryItem> {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            debug!(id, "delete of missing item");
            return RemoveOutcome::NotFound;
        };

        let removed = self.items.remove(pos);
        debug!(id, "delete item");
        self.dirty.mark_dirty();
        self.notifier
            .publish(EventKind::InventoryChanged, Payload::ItemRemoved(id));
        RemoveOutcome::Removed(removed)
    }

    /// Add a location to the set, keeping it sorted
    pub fn add_location(&mut self, name: &str) -> Result<(), InventoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InventoryError::Validation(
                "location name is required".to_string(),
            ));
        }
        if let Some(existing) = self.find_location(name) {
            return Err(InventoryError::Duplicate(existing.to_string()));
        }

        self.locations.push(name.to_string());
        self.locations.sort_by(|a, b| compare_locations(a, b));
        debug!(location = name, "add location");
        self.dirty.mark_dirty();
        self.notifier.publish(
            EventKind::LocationsChanged,
            Payload::LocationAdded(name.to_string()),
        );
        Ok(())
    }

    /// Remove a location; items stored there keep their location text
    pub fn remove_location(&mut self, name: &str) -> RemoveOutcome<String> {
        let wanted = name.trim().to_lowercase();
        let Some(pos) = self
            .locations
            .iter()
            .position(|l| l.to_lowercase() == wanted)
        else {
            return RemoveOutcome::NotFound;
        };

        let removed = self.locations.remove(pos);
        debug!(location = %removed, "remove location");
        self.dirty.mark_dirty();
        self.notifier.publish(
            EventKind::LocationsChanged,
            Payload::LocationRemoved(removed.clone()),
        );
        RemoveOutcome::Removed(removed)
    }

    /// Append a batch of drafts and merge their locations.
    ///
    /// All drafts are validated before anything is stored, so a bad draft
    /// leaves the store untouched. Ids continue from [`ItemStore::next_id`].
    pub fn import_items(
        &mut self,
        drafts: Vec<ItemDraft>,
        locations: &[String],
    ) -> Result<ImportSummary, InventoryError> {
        for (idx, draft) in drafts.iter().enumerate() {
            draft.validate().map_err(|e| match e {
                InventoryError::Validation(msg) => {
                    InventoryError::Validation(format!("import entry {}: {}", idx + 1, msg))
                }
                other => other,
            })?;
        }

        let now = Utc::now();
        let mut last = self.last_id();
        let mut summary = ImportSummary::default();
        let mut staged = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = last.checked_add(1).ok_or_else(ids_exhausted)?;
            staged.push(draft.into_item(id, now)?);
            summary.ids.push(id);
            last = id;
        }

        for location in locations {
            let location = location.trim();
            let lower = location.to_lowercase();
            if location.is_empty()
                || self.has_location(location)
                || summary.new_locations.iter().any(|l| l.to_lowercase() == lower)
            {
                continue;
            }
            summary.new_locations.push(location.to_string());
        }

        if staged.is_empty() && summary.new_locations.is_empty() {
            return Ok(summary);
        }

        let count = staged.len();
        if let Some(last) = summary.ids.last() {
            self.high_water = *last;
        }
        self.items.extend(staged);
        self.locations.extend(summary.new_locations.iter().cloned());
        self.locations.sort_by(|a, b| compare_locations(a, b));
        debug!(count, new_locations = summary.new_locations.len(), "import items");

        self.dirty.mark_dirty();
        if count > 0 {
            self.notifier
                .publish(EventKind::InventoryChanged, Payload::ItemsImported { count });
        }
        if !summary.new_locations.is_empty() {
            self.notifier.publish(
                EventKind::LocationsChanged,
                Payload::LocationsReplaced {
                    count: self.locations.len(),
                },
            );
        }
        Ok(summary)
    }

    /// Swap in collections read back from disk; the store is clean afterwards
    pub fn replace_all(&mut self, items: Vec<InventoryItem>, locations: Vec<String>) {
        self.high_water = items.iter().map(|i| i.id).max().unwrap_or(0);
        self.items = items;
        self.locations = normalize_locations(locations);
        debug!(items = self.items.len(), locations = self.locations.len(), "replace all");

        self.dirty.mark_clean();
        self.notifier.publish(
            EventKind::InventoryChanged,
            Payload::ItemsReplaced {
                count: self.items.len(),
            },
        );
        self.notifier.publish(
            EventKind::LocationsChanged,
            Payload::LocationsReplaced {
                count: self.locations.len(),
            },
        );
    }

    /// Record a successful write of both collections
    pub fn mark_saved(&self) {
        self.dirty.mark_clean();
    }
}

fn ids_exhausted() -> InventoryError {
    InventoryError::Validation(format!("no item ids left above {}", u32::MAX))
}

/// Trim, drop blanks and case-insensitive duplicates, then sort
fn normalize_locations(locations: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(locations.len());
    for location in locations {
        let location = location.trim();
        if location.is_empty() {
            continue;
        }
        let lower = location.to_lowercase();
        if out.iter().any(|l| l.to_lowercase() == lower) {
            continue;
        }
        out.push(location.to_string());
    }
    out.sort_by(|a, b| compare_locations(a, b));
    out
}
