//! Table formatting for item lists
//!
//! Every list-shaped output (list, find, the shell's table view) goes through
//! [`TableFormatter`], so columns look the same in all of them.

use chrono::{DateTime, Local, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::InventoryItem;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Item id (cyan)
    Id(u32),
    /// Inventory number (yellow)
    Number(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Piece count; zero is highlighted
    Quantity(u32),
    /// Location, "-" when unset
    Location(String),
    /// Timestamp displayed in local time
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Number(n) => format!(
                "{:<width$}",
                style(truncate_str(n, width.saturating_sub(2))).yellow(),
                width = width
            ),
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width.saturating_sub(2)), width = width)
            }
            CellValue::Quantity(q) => {
                let styled = if *q == 0 { style(q).red() } else { style(q).white() };
                format!("{:>width$}", styled, width = width)
            }
            CellValue::Location(loc) if loc.is_empty() => {
                format!("{:<width$}", style("-").dim(), width = width)
            }
            CellValue::Location(loc) => {
                format!("{:<width$}", truncate_str(loc, width.saturating_sub(2)), width = width)
            }
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d %H:%M"), width = width)
            }
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::DateTime(dt) => dt.to_rfc3339(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Location(loc) if loc.is_empty() => "-".to_string(),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d %H:%M").to_string()
            }
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Number(s) | CellValue::Text(s) | CellValue::Location(s) => s.clone(),
            CellValue::Quantity(q) => q.to_string(),
            CellValue::DateTime(dt) => dt.to_rfc3339(),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Location(loc) if loc.is_empty() => 1,
            CellValue::DateTime(_) => 16, // "YYYY-MM-DD HH:MM"
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width cap
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// Columns of an item table, in display order
pub const ITEM_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("inventory-number", "INV#", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("description", "DESCRIPTION", 32),
    ColumnDef::new("quantity", "QTY", 6),
    ColumnDef::new("location", "LOCATION", 18),
    ColumnDef::new("last-updated", "UPDATED", 16),
];

/// Columns shown when none are requested
pub const DEFAULT_COLUMNS: &[&str] = &["id", "inventory-number", "name", "quantity", "location"];

/// A row of cell values for table output
pub struct TableRow {
    pub id: u32,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Row with every item column filled
    pub fn from_item(item: &InventoryItem) -> Self {
        Self::new(item.id)
            .cell("id", CellValue::Id(item.id))
            .cell("inventory-number", CellValue::Number(item.inventory_number.clone()))
            .cell("name", CellValue::Text(item.name.clone()))
            .cell("description", CellValue::Text(item.description.clone()))
            .cell("quantity", CellValue::Quantity(item.quantity))
            .cell("location", CellValue::Location(item.location.clone()))
            .cell("last-updated", CellValue::DateTime(item.last_updated))
    }
}

/// Table formatter that renders rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef]) -> Self {
        Self {
            columns,
            show_summary: true,
        }
    }

    /// Drop the trailing count line (for piping)
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Print rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat, visible_columns: &[&str])
    where
        I: IntoIterator<Item = TableRow>,
    {
        print!("{}", self.render(rows, format, visible_columns));
    }

    /// Render rows in the specified format
    pub fn render<I>(&self, rows: I, format: OutputFormat, visible_columns: &[&str]) -> String
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        let visible: Vec<&ColumnDef> = self
            .columns
            .iter()
            .filter(|c| visible_columns.contains(&c.key))
            .collect();

        match format {
            OutputFormat::Csv => self.render_csv(&rows, &visible),
            OutputFormat::Md => self.render_md(&rows, &visible),
            OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
            _ => self.render_tsv(&rows, &visible),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow], visible: &[&ColumnDef]) -> Vec<usize> {
        visible
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // +2 leaves room for the truncation marker
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width.max(col.header.len()))
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow], visible: &[&ColumnDef]) -> String {
        let widths = self.calculate_widths(rows, visible);
        let mut out = String::new();

        let header: Vec<String> = visible
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = visible
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = *w),
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!("{} item(s) found.\n", style(rows.len()).cyan()));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow], visible: &[&ColumnDef]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = visible.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = visible
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_csv()).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow], visible: &[&ColumnDef]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = visible.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = visible
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_md()).unwrap_or_else(|| "-".to_string()))
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ItemDraft;

    fn rows() -> Vec<TableRow> {
        vec![
            ItemDraft::new("A-1", "Widget").with_quantity(5).with_location("Shelf1"),
            ItemDraft::new("A-2", "Pipe | fitting"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, d)| d.into_item(i as u32 + 1, Utc::now()).unwrap())
        .map(|item| TableRow::from_item(&item))
        .collect()
    }

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::Text("Hello World".to_string());
        assert!(cell.format_tsv(20).contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_cell_value_md_escapes_pipes() {
        let cell = CellValue::Text("a|b|c".to_string());
        assert_eq!(cell.format_md(), "a\\|b\\|c");
    }

    #[test]
    fn test_empty_location_placeholder() {
        let cell = CellValue::Location(String::new());
        assert_eq!(cell.format_md(), "-");
        assert_eq!(cell.format_csv(), "");
    }

    #[test]
    fn test_render_csv() {
        let out = TableFormatter::new(ITEM_COLUMNS).render(rows(), OutputFormat::Csv, DEFAULT_COLUMNS);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,inventory-number,name,quantity,location");
        assert_eq!(lines[1], "1,A-1,Widget,5,Shelf1");
        assert_eq!(lines[2], "2,A-2,Pipe | fitting,0,");
    }

    #[test]
    fn test_render_md() {
        let out = TableFormatter::new(ITEM_COLUMNS).render(rows(), OutputFormat::Md, &["id", "name"]);
        assert!(out.starts_with("| ID | NAME |\n|---|---|\n"));
        assert!(out.contains("| 2 | Pipe \\| fitting |"));
    }

    #[test]
    fn test_render_ids() {
        let out = TableFormatter::new(ITEM_COLUMNS).render(rows(), OutputFormat::Id, DEFAULT_COLUMNS);
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn test_render_tsv_summary() {
        console::set_colors_enabled(false);
        let out = TableFormatter::new(ITEM_COLUMNS).render(rows(), OutputFormat::Tsv, DEFAULT_COLUMNS);
        assert!(out.contains("Widget"));
        assert!(out.trim_end().ends_with("2 item(s) found."));

        let piped = TableFormatter::new(ITEM_COLUMNS)
            .without_summary()
            .render(rows(), OutputFormat::Tsv, DEFAULT_COLUMNS);
        assert!(!piped.contains("found"));
    }
}
