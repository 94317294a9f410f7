//! Printable label sheets

use std::fmt;

use tabled::{builder::Builder, settings::Style};

use crate::core::query::find_by_inventory_number;
use crate::entities::item::InventoryItem;

/// Labels per row on a sheet
pub const LABELS_PER_ROW: usize = 3;

/// Which items get a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSelection {
    All,
    /// Exact location, ignoring case
    Location(String),
    /// Inventory number containing the text, ignoring case
    Pattern(String),
}

impl LabelSelection {
    pub fn title(&self) -> String {
        match self {
            LabelSelection::All => "Inventory Labels - All Items".to_string(),
            LabelSelection::Location(loc) => format!("Inventory Labels - Location: {}", loc),
            LabelSelection::Pattern(p) => format!("Inventory Labels - Inventory #: {}", p),
        }
    }

    /// Items to label, ordered by inventory number then name
    pub fn select<'a>(&self, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
        let mut selected: Vec<&InventoryItem> = match self {
            LabelSelection::All => items.iter().collect(),
            LabelSelection::Location(loc) => {
                let wanted = loc.trim().to_lowercase();
                items
                    .iter()
                    .filter(|i| i.location.to_lowercase() == wanted)
                    .collect()
            }
            LabelSelection::Pattern(p) => find_by_inventory_number(items, p),
        };
        selected.sort_by(|a, b| {
            a.inventory_number
                .to_lowercase()
                .cmp(&b.inventory_number.to_lowercase())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        selected
    }
}

impl fmt::Display for LabelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSelection::All => write!(f, "all items"),
            LabelSelection::Location(loc) => write!(f, "location '{}'", loc),
            LabelSelection::Pattern(p) => write!(f, "inventory number '{}'", p),
        }
    }
}

fn label_text(item: &InventoryItem) -> String {
    format!(
        "Inv#: {}\n{}\nId: {}  Qty: {}\nLoc: {}",
        item.inventory_number,
        item.name,
        item.id,
        item.quantity,
        if item.location.is_empty() { "-" } else { item.location.as_str() }
    )
}

/// Render a sheet of label blocks, [`LABELS_PER_ROW`] to a row
pub fn render_sheet(title: &str, items: &[&InventoryItem]) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    output.push_str(&"=".repeat(title.chars().count()));
    output.push_str("\n\n");

    let mut builder = Builder::default();
    for chunk in items.chunks(LABELS_PER_ROW) {
        let mut row: Vec<String> = chunk.iter().map(|i| label_text(i)).collect();
        row.resize(LABELS_PER_ROW, String::new());
        builder.push_record(row);
    }
    output.push_str(&builder.build().with(Style::ascii()).to_string());
    output.push_str(&format!("\n\n{} label(s)\n", items.len()));
    output
}
