//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::query::SortColumn;
use crate::core::theme::Theme;

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = "inv.yaml";

/// Every key `inv config keys` reports
pub const CONFIG_KEYS: [(&str, &str); 6] = [
    ("data_dir", "Directory holding the data files (default: .)"),
    ("inventory_file", "Item file name inside data_dir (default: inventory.json)"),
    ("locations_file", "Location file name inside data_dir (default: locations.json)"),
    ("default_format", "Output format when --format is auto (tsv, csv, md, json, id)"),
    ("default_sort", "Initial sort column (id, inventory-number, name, quantity, location, last-updated)"),
    ("theme", "Interactive shell theme (color, plain)"),
];

/// inv configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding inventory.json and locations.json
    pub data_dir: Option<PathBuf>,

    /// Item file name, relative to `data_dir`
    pub inventory_file: Option<String>,

    /// Location file name, relative to `data_dir`
    pub locations_file: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Initial sort column of list views
    pub default_sort: Option<String>,

    /// Shell theme
    pub theme: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/inv/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Working-directory config (./inv.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var("INV_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(format) = std::env::var("INV_FORMAT") {
            if !format.trim().is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "inv")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.inventory_file.is_some() {
            self.inventory_file = other.inventory_file;
        }
        if other.locations_file.is_some() {
            self.locations_file = other.locations_file;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.default_sort.is_some() {
            self.default_sort = other.default_sort;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
    }

    /// Apply the `--data-dir` flag, the last layer
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.data_dir = dir;
        }
        self
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir()
            .join(self.inventory_file.as_deref().unwrap_or("inventory.json"))
    }

    pub fn locations_path(&self) -> PathBuf {
        self.data_dir()
            .join(self.locations_file.as_deref().unwrap_or("locations.json"))
    }

    /// Configured initial sort column; unknown names fall back to id
    pub fn sort_column(&self) -> SortColumn {
        self.default_sort
            .as_deref()
            .map(SortColumn::parse_or_default)
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.inventory_path(), PathBuf::from("./inventory.json"));
        assert_eq!(config.locations_path(), PathBuf::from("./locations.json"));
        assert_eq!(config.sort_column(), SortColumn::Id);
        assert_eq!(config.theme(), Theme::Color);
    }

    #[test]
    fn test_later_layer_wins() {
        let mut config: Config = serde_yml::from_str("data_dir: /srv/inv\ntheme: plain\n").unwrap();
        let local: Config = serde_yml::from_str("default_sort: name\n").unwrap();
        config.merge(local);
        let config = config.with_data_dir(Some(PathBuf::from("/tmp/other")));

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/other"));
        assert_eq!(config.sort_column(), SortColumn::Name);
        assert_eq!(config.theme(), Theme::Plain);
    }

    #[test]
    fn test_custom_file_names() {
        let config: Config =
            serde_yml::from_str("data_dir: data\ninventory_file: items.json\n").unwrap();
        assert_eq!(config.inventory_path(), PathBuf::from("data/items.json"));
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let config: Config = serde_yml::from_str("default_sort: colour\n").unwrap();
        assert_eq!(config.sort_column(), SortColumn::Id);
    }
}
