//! Shared utilities for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::table::{TableFormatter, TableRow, ITEM_COLUMNS};
use crate::cli::OutputFormat;
use crate::core::{InventoryError, Persistence, Session};
use crate::entities::InventoryItem;

/// Resolve a location typed on the command line to its stored spelling.
///
/// Blank input means "no location". An unknown location is added when
/// `create` is set and rejected otherwise.
pub fn resolve_location<P: Persistence>(
    session: &mut Session<P>,
    name: &str,
    create: bool,
) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(String::new());
    }
    if let Some(existing) = session.store().find_location(name) {
        return Ok(existing.to_string());
    }
    if !create {
        return Err(InventoryError::Validation(format!(
            "location '{}' does not exist (pass --create-location or run `inv location add`)",
            name
        ))
        .into());
    }
    session.store_mut().add_location(name)?;
    println!("{} Added location {}", style("✓").green(), style(name).yellow());
    Ok(name.to_string())
}

/// Print items in a list format
pub fn print_items(
    items: &[&InventoryItem],
    format: OutputFormat,
    columns: &[&str],
    summary: bool,
) -> Result<()> {
    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(items).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    let formatter = TableFormatter::new(ITEM_COLUMNS);
    let formatter = if summary { formatter } else { formatter.without_summary() };
    formatter.output(items.iter().map(|i| TableRow::from_item(i)), format, columns);
    Ok(())
}

/// Two-column detail table of one item
pub fn render_detail(item: &InventoryItem) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Id".to_string(), item.id.to_string()]);
    builder.push_record(["Inventory number".to_string(), item.inventory_number.clone()]);
    builder.push_record(["Name".to_string(), item.name.clone()]);
    builder.push_record(["Description".to_string(), item.description.clone()]);
    builder.push_record(["Quantity".to_string(), item.quantity.to_string()]);
    builder.push_record(["Location".to_string(), item.location.clone()]);
    builder.push_record([
        "Last updated".to_string(),
        item.last_updated
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    ]);
    builder.build().with(Style::rounded()).to_string()
}
