//! JSON persistence of the item and location collections

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::error::InventoryError;
use crate::core::store::compare_locations;
use crate::entities::item::InventoryItem;

/// A data file that existed but could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProblem {
    pub path: PathBuf,
    pub message: String,
}

/// A loaded collection, plus the problem if the file had to be ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub values: Vec<T>,
    pub problem: Option<LoadProblem>,
}

impl<T> Loaded<T> {
    fn clean(values: Vec<T>) -> Self {
        Self { values, problem: None }
    }

    fn degraded(path: &Path, message: String) -> Self {
        Self {
            values: Vec::new(),
            problem: Some(LoadProblem {
                path: path.to_path_buf(),
                message,
            }),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.problem.is_some()
    }
}

/// Where the two collections live
///
/// Loads never fail: a missing or blank file yields an empty collection, and
/// an unreadable or malformed one yields an empty collection together with a
/// [`LoadProblem`]. Saves report every failure.
pub trait Persistence {
    fn load_items(&self) -> Loaded<InventoryItem>;
    fn save_items(&self, items: &[InventoryItem]) -> Result<(), InventoryError>;
    fn load_locations(&self) -> Loaded<String>;
    fn save_locations(&self, locations: &[String]) -> Result<(), InventoryError>;

    /// Copy a file that failed to load out of the way before it is
    /// overwritten; returns the copy's path
    fn preserve(&self, problem: &LoadProblem) -> Result<PathBuf, InventoryError>;
}

/// Pretty-printed JSON files in a data directory
#[derive(Debug, Clone)]
pub struct JsonStorage {
    items_path: PathBuf,
    locations_path: PathBuf,
}

impl JsonStorage {
    pub fn new(items_path: impl Into<PathBuf>, locations_path: impl Into<PathBuf>) -> Self {
        Self {
            items_path: items_path.into(),
            locations_path: locations_path.into(),
        }
    }

    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("inventory.json"), dir.join("locations.json"))
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    pub fn locations_path(&self) -> &Path {
        &self.locations_path
    }
}

fn load_array<T: DeserializeOwned>(path: &Path) -> Loaded<T> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file, starting empty");
            return Loaded::clean(Vec::new());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read data file, starting empty");
            return Loaded::degraded(path, e.to_string());
        }
    };

    if contents.trim().is_empty() {
        return Loaded::clean(Vec::new());
    }

    match serde_json::from_str::<Vec<T>>(&contents) {
        Ok(values) => {
            debug!(path = %path.display(), count = values.len(), "loaded");
            Loaded::clean(values)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed data file, starting empty");
            Loaded::degraded(path, e.to_string())
        }
    }
}

/// `inventory.json` -> `inventory.json.bak`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

fn save_array<T: Serialize>(path: &Path, values: &[T]) -> Result<(), InventoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| InventoryError::write(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(values).map_err(|e| InventoryError::write(path, e))?;
    fs::write(path, json).map_err(|e| InventoryError::write(path, e))?;
    debug!(path = %path.display(), count = values.len(), "saved");
    Ok(())
}

impl Persistence for JsonStorage {
    fn load_items(&self) -> Loaded<InventoryItem> {
        load_array(&self.items_path)
    }

    fn save_items(&self, items: &[InventoryItem]) -> Result<(), InventoryError> {
        save_array(&self.items_path, items)
    }

    fn load_locations(&self) -> Loaded<String> {
        load_array(&self.locations_path)
    }

    fn save_locations(&self, locations: &[String]) -> Result<(), InventoryError> {
        let mut sorted = locations.to_vec();
        sorted.sort_by(|a, b| compare_locations(a, b));
        save_array(&self.locations_path, &sorted)
    }

    fn preserve(&self, problem: &LoadProblem) -> Result<PathBuf, InventoryError> {
        let backup = backup_path(&problem.path);
        fs::copy(&problem.path, &backup).map_err(|e| InventoryError::write(&backup, e))?;
        warn!(
            path = %problem.path.display(),
            backup = %backup.display(),
            "kept a copy of the unreadable data file"
        );
        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::item::ItemDraft;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_load_empty() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        let items = storage.load_items();
        assert!(items.values.is_empty());
        assert!(!items.is_degraded());
        assert!(storage.load_locations().values.is_empty());
    }

    #[test]
    fn test_blank_and_malformed_files_load_empty() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        fs::write(storage.items_path(), "   \n").unwrap();
        fs::write(storage.locations_path(), "{not json").unwrap();

        let items = storage.load_items();
        assert!(items.values.is_empty());
        assert!(!items.is_degraded());

        let locations = storage.load_locations();
        assert!(locations.values.is_empty());
        let problem = locations.problem.unwrap();
        assert_eq!(problem.path, storage.locations_path());
    }

    #[test]
    fn test_bad_record_marks_load_degraded() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        let contents = r#"[
  {"Id": 1, "InventoryNumber": "A-1", "Name": "Widget", "LastUpdated": "2024-05-02T09:30:00Z"},
  {"Id": 2, "InventoryNumber": "A-2", "Name": "Gadget", "LastUpdated": "not-a-date"}
]"#;
        fs::write(storage.items_path(), contents).unwrap();

        let items = storage.load_items();
        assert!(items.values.is_empty());
        let problem = items.problem.unwrap();

        let backup = storage.preserve(&problem).unwrap();
        assert_eq!(backup, tmp.path().join("inventory.json.bak"));
        assert_eq!(fs::read_to_string(backup).unwrap(), contents);
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        let items = vec![
            ItemDraft::new("A-1", "Widget")
                .with_description("Größe M, 日本製")
                .with_quantity(5)
                .with_location("Regal Ä")
                .into_item(1, Utc::now())
                .unwrap(),
            ItemDraft::new("A-1", "Kabel \"lang\"")
                .into_item(2, Utc::now())
                .unwrap(),
        ];

        storage.save_items(&items).unwrap();
        assert_eq!(storage.load_items().values, items);
    }

    #[test]
    fn test_locations_are_sorted_on_save() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        storage
            .save_locations(&["shelf2".into(), "Bin".into(), "attic".into()])
            .unwrap();

        assert_eq!(storage.load_locations().values, vec!["attic", "Bin", "shelf2"]);
    }

    #[test]
    fn test_save_creates_data_directory() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(&tmp.path().join("nested").join("data"));
        storage.save_locations(&["Bin".into()]).unwrap();
        assert!(storage.locations_path().exists());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let tmp = tempdir().unwrap();
        // a directory where the file should be
        let blocked = tmp.path().join("inventory.json");
        fs::create_dir(&blocked).unwrap();
        let storage = JsonStorage::new(&blocked, tmp.path().join("locations.json"));

        let err = storage.save_items(&[]).unwrap_err();
        assert!(matches!(err, InventoryError::Persistence { action: "write", .. }));
    }

    #[test]
    fn test_reads_pascal_case_records() {
        let tmp = tempdir().unwrap();
        let storage = JsonStorage::in_dir(tmp.path());
        fs::write(
            storage.items_path(),
            r#"[
  {
    "Id": 4,
    "InventoryNumber": "ASSET-001",
    "Name": "Laptop",
    "Description": "",
    "Quantity": 1,
    "Location": "Office",
    "LastUpdated": "2024-05-02T09:30:00.1234567+02:00"
  }
]"#,
        )
        .unwrap();

        let items = storage.load_items().values;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 4);
        assert_eq!(items[0].inventory_number, "ASSET-001");
    }
}
