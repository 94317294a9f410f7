//! CSV import and export of items

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::core::error::InventoryError;
use crate::entities::item::{InventoryItem, ItemDraft};

/// Column order of exported files
pub const CSV_HEADERS: [&str; 7] = [
    "Id",
    "InventoryNumber",
    "Name",
    "Description",
    "Quantity",
    "Location",
    "LastUpdated",
];

/// A row that could not be turned into a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the file (the header is row 1)
    pub row: usize,
    pub message: String,
}

/// Parsed contents of an import file
#[derive(Debug, Default)]
pub struct CsvImport {
    pub rows_processed: usize,
    pub drafts: Vec<ItemDraft>,
    /// Distinct non-empty row locations, first spelling wins
    pub locations: Vec<String>,
    /// Rows skipped because they were invalid
    pub rejected: Vec<RowError>,
}

/// Map normalized header name to column index.
///
/// Headers are compared without case, spaces, dashes or underscores, so
/// `InventoryNumber`, `inventory_number` and `Inventory Number` are the same.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect()
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .to_lowercase()
}

fn get_field(record: &StringRecord, header_map: &HashMap<String, usize>, field: &str) -> Option<String> {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn draft_from_record(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<ItemDraft, String> {
    let quantity = match get_field(record, header_map, "quantity") {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| format!("quantity '{}' is not a whole number", raw))?,
        None => 0,
    };

    let draft = ItemDraft::new(
        get_field(record, header_map, "inventorynumber").unwrap_or_default(),
        get_field(record, header_map, "name").unwrap_or_default(),
    )
    .with_description(get_field(record, header_map, "description").unwrap_or_default())
    .with_quantity(quantity)
    .with_location(get_field(record, header_map, "location").unwrap_or_default());

    draft.validate().map_err(|e| match e {
        InventoryError::Validation(msg) => msg,
        other => other.to_string(),
    })?;
    Ok(draft)
}

/// Line on which a record starts; quoted fields may span several lines
fn line_of(position: Option<&csv::Position>, fallback: u64) -> usize {
    position.map_or(fallback, |p| p.line()) as usize
}

/// Parse item rows from `reader`.
///
/// `Id` and `LastUpdated` columns are ignored. Without `skip_errors` the first
/// bad row aborts with [`InventoryError::Csv`]; with it, bad rows are collected
/// in [`CsvImport::rejected`].
pub fn read_items<R: Read>(
    reader: R,
    source: &Path,
    skip_errors: bool,
) -> Result<CsvImport, InventoryError> {
    let csv_error = |row: usize, message: String| InventoryError::Csv {
        path: source.to_path_buf(),
        row,
        message,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(1, e.to_string()))?.clone();
    let header_map = build_header_map(&headers);
    for required in ["inventorynumber", "name"] {
        if !header_map.contains_key(required) {
            return Err(csv_error(1, format!("missing '{}' column", required)));
        }
    }

    let mut import = CsvImport::default();
    let mut record = StringRecord::new();
    loop {
        let next_line = rdr.position().line();
        let (row, outcome) = match rdr.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => (
                line_of(record.position(), next_line),
                draft_from_record(&record, &header_map),
            ),
            Err(e) => (
                line_of(e.position(), next_line),
                Err(format!("CSV parse error: {}", e)),
            ),
        };
        import.rows_processed += 1;

        match outcome {
            Ok(draft) => {
                let location = draft.location.trim();
                let lower = location.to_lowercase();
                if !location.is_empty()
                    && !import.locations.iter().any(|l| l.to_lowercase() == lower)
                {
                    import.locations.push(location.to_string());
                }
                import.drafts.push(draft);
            }
            Err(message) if skip_errors => {
                debug!(row, %message, "skipping CSV row");
                import.rejected.push(RowError { row, message });
            }
            Err(message) => return Err(csv_error(row, message)),
        }
    }

    Ok(import)
}

/// Read an import file from disk
pub fn import_file(path: &Path, skip_errors: bool) -> Result<CsvImport, InventoryError> {
    let file = File::open(path).map_err(|e| InventoryError::read(path, e))?;
    read_items(BufReader::new(file), path, skip_errors)
}

/// Write items with the export header
pub fn write_items<'a, W, I>(writer: W, items: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a InventoryItem>,
{
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for item in items {
        wtr.write_record([
            item.id.to_string(),
            item.inventory_number.clone(),
            item.name.clone(),
            item.description.clone(),
            item.quantity.to_string(),
            item.location.clone(),
            item.last_updated.to_rfc3339(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export items to a file, replacing it
pub fn export_file<'a, I>(path: &Path, items: I) -> Result<usize, InventoryError>
where
    I: IntoIterator<Item = &'a InventoryItem>,
{
    let items: Vec<&InventoryItem> = items.into_iter().collect();
    let file = File::create(path).map_err(|e| InventoryError::write(path, e))?;
    write_items(file, items.iter().copied()).map_err(|e| InventoryError::write(path, e))?;
    debug!(path = %path.display(), count = items.len(), "exported CSV");
    Ok(items.len())
}
