//! Sorting and filtering of the item collection
//!
//! Everything here is a pure function of a slice and a [`QuerySpec`]; the
//! result borrows from the input and the input is never reordered.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::item::InventoryItem;

/// Column a view can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortColumn {
    #[default]
    Id,
    InventoryNumber,
    Name,
    Quantity,
    Location,
    LastUpdated,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::InventoryNumber,
        SortColumn::Name,
        SortColumn::Quantity,
        SortColumn::Location,
        SortColumn::LastUpdated,
    ];

    /// Parse a column name, falling back to `Id` for anything unknown
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Header text used in tables and CSV files
    pub fn header(&self) -> &'static str {
        match self {
            SortColumn::Id => "Id",
            SortColumn::InventoryNumber => "InventoryNumber",
            SortColumn::Name => "Name",
            SortColumn::Quantity => "Quantity",
            SortColumn::Location => "Location",
            SortColumn::LastUpdated => "LastUpdated",
        }
    }

    fn compare(&self, a: &InventoryItem, b: &InventoryItem) -> Ordering {
        match self {
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::InventoryNumber => compare_text(&a.inventory_number, &b.inventory_number),
            SortColumn::Name => compare_text(&a.name, &b.name),
            SortColumn::Quantity => a.quantity.cmp(&b.quantity),
            SortColumn::Location => compare_text(&a.location, &b.location),
            SortColumn::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "id" => Ok(SortColumn::Id),
            "inventorynumber" | "number" | "inv" => Ok(SortColumn::InventoryNumber),
            "name" => Ok(SortColumn::Name),
            "quantity" | "qty" => Ok(SortColumn::Quantity),
            "location" | "loc" => Ok(SortColumn::Location),
            "lastupdated" | "updated" => Ok(SortColumn::LastUpdated),
            _ => Err(format!("unknown sort column: {}", s)),
        }
    }
}

/// Case-insensitive comparison with an ordinal tie-break
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Restrict a view to one location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationFilter {
    #[default]
    All,
    Only(String),
}

impl LocationFilter {
    /// Blank input means no restriction
    pub fn from_input(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            Some(loc) if !loc.is_empty() => LocationFilter::Only(loc.to_string()),
            _ => LocationFilter::All,
        }
    }

    fn matches(&self, item: &InventoryItem) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Only(loc) => item.location.to_lowercase() == loc.to_lowercase(),
        }
    }
}

/// Current sort and filter settings of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub sort_column: SortColumn,
    pub ascending: bool,
    pub text_filter: String,
    pub location_filter: LocationFilter,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            sort_column: SortColumn::Id,
            ascending: true,
            text_filter: String::new(),
            location_filter: LocationFilter::All,
        }
    }
}

impl QuerySpec {
    pub fn sorted_by(column: SortColumn) -> Self {
        Self {
            sort_column: column,
            ..Default::default()
        }
    }

    /// Drop text and location filters, keep the sort
    pub fn clear_filters(&mut self) {
        self.text_filter.clear();
        self.location_filter = LocationFilter::All;
    }

    pub fn is_filtered(&self) -> bool {
        !self.text_filter.trim().is_empty() || self.location_filter != LocationFilter::All
    }
}

fn matches_text(item: &InventoryItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.inventory_number.to_lowercase().contains(needle)
        || item.description.to_lowercase().contains(needle)
}

/// Filter and sort `items` according to `spec`
pub fn run_query<'a>(items: &'a [InventoryItem], spec: &QuerySpec) -> Vec<&'a InventoryItem> {
    let needle = if spec.text_filter.trim().is_empty() {
        String::new()
    } else {
        spec.text_filter.to_lowercase()
    };

    let mut view: Vec<&InventoryItem> = items
        .iter()
        .filter(|item| spec.location_filter.matches(item))
        .filter(|item| needle.is_empty() || matches_text(item, &needle))
        .collect();

    // sort_by is stable: equal keys keep collection order in both directions
    if spec.ascending {
        view.sort_by(|a, b| spec.sort_column.compare(a, b));
    } else {
        view.sort_by(|a, b| spec.sort_column.compare(b, a));
    }
    view
}

/// Items whose name contains `pattern` (case-insensitive, literal)
pub fn find_by_name<'a>(items: &'a [InventoryItem], pattern: &str) -> Vec<&'a InventoryItem> {
    let needle = pattern.trim().to_lowercase();
    items
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .collect()
}

/// Items whose inventory number contains `pattern` (case-insensitive, literal)
pub fn find_by_inventory_number<'a>(
    items: &'a [InventoryItem],
    pattern: &str,
) -> Vec<&'a InventoryItem> {
    let needle = pattern.trim().to_lowercase();
    items
        .iter()
        .filter(|i| i.inventory_number.to_lowercase().contains(&needle))
        .collect()
}

/// Shown/total counts of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSummary {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for ViewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Displaying {} of {} items.", self.shown, self.total)
    }
}
