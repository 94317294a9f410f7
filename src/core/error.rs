//! Error kinds reported by store, storage and codec operations

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with the inventory
///
/// Each variant is a distinct, recoverable kind: callers match on the variant
/// rather than on message text.
#[derive(Debug, Error, Diagnostic)]
pub enum InventoryError {
    /// A required field is empty, a quantity is negative, or a location
    /// selection is not acceptable
    #[error("invalid input: {0}")]
    #[diagnostic(code(inv::validation))]
    Validation(String),

    /// The targeted item no longer exists (e.g. a stale selection)
    #[error("no item with id {0}")]
    #[diagnostic(
        code(inv::not_found),
        help("run `inv list` to see the current item ids")
    )]
    NotFound(u32),

    /// A location with the same name (ignoring case) already exists
    #[error("location '{0}' already exists")]
    #[diagnostic(code(inv::duplicate))]
    Duplicate(String),

    /// Reading or writing a data file failed; memory is left as it was
    #[error("could not {action} {path:?}: {message}")]
    #[diagnostic(
        code(inv::persistence),
        help("unsaved changes are still in memory; fix the problem and save again")
    )]
    Persistence {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    /// A data file could not be loaded, so writing now would drop its records
    #[error("{path:?} could not be loaded ({message}); refusing to overwrite it")]
    #[diagnostic(
        code(inv::degraded_load),
        help("fix or move the file aside; read-only commands keep working, and the shell keeps a .bak copy when you save")
    )]
    DegradedLoad { path: PathBuf, message: String },

    /// A CSV file could not be parsed
    #[error("CSV error in {path:?} (row {row}): {message}")]
    #[diagnostic(code(inv::csv))]
    Csv {
        path: PathBuf,
        row: usize,
        message: String,
    },
}

impl InventoryError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        InventoryError::Persistence {
            action: "read",
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        InventoryError::Persistence {
            action: "write",
            path: path.into(),
            message: err.to_string(),
        }
    }
}
