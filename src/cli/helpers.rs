//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{ChangeNotifier, Config, JsonStorage, QuerySpec, Session};

/// Load the layered config with the `--data-dir` flag applied
pub fn load_config(global: &GlobalOpts) -> Config {
    Config::load().with_data_dir(global.data_dir.clone())
}

/// Open a session on the configured data files
pub fn open_session(config: &Config) -> Session<JsonStorage> {
    let storage = JsonStorage::new(config.inventory_path(), config.locations_path());
    Session::open(storage, ChangeNotifier::new())
        .with_query(QuerySpec::sorted_by(config.sort_column()))
        .with_theme(config.theme())
}

/// Open a session for a command that will save.
///
/// Fails when a data file existed but could not be loaded, since saving would
/// replace it with whatever is left in memory.
pub fn open_session_for_update(config: &Config) -> Result<Session<JsonStorage>> {
    let session = open_session(config);
    session.ensure_clean_load()?;
    Ok(session)
}

/// Resolve `--format auto` against the configured default
pub fn resolve_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .filter(|f| *f != OutputFormat::Auto)
        .unwrap_or(fallback)
}

/// Print a success line unless `--quiet`
pub fn report_success(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet {
        println!("{} {}", style("✓").green(), message);
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
