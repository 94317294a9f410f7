//! `inv find` command - partial-match lookups

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::utils::print_items;
use crate::cli::helpers::{load_config, open_session, resolve_format};
use crate::cli::table::DEFAULT_COLUMNS;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::query::{find_by_inventory_number, find_by_name};

#[derive(Subcommand, Debug)]
pub enum FindCommands {
    /// Items whose name contains the text (case-insensitive)
    Name {
        /// Text to look for
        pattern: String,
    },

    /// Items whose inventory number contains the text (case-insensitive)
    Number {
        /// Text to look for
        pattern: String,
    },
}

pub fn run(cmd: FindCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);
    let items = session.store().items();

    let (found, what, pattern) = match &cmd {
        FindCommands::Name { pattern } => (find_by_name(items, pattern), "name", pattern),
        FindCommands::Number { pattern } => {
            (find_by_inventory_number(items, pattern), "inventory number", pattern)
        }
    };

    if found.is_empty() {
        if !global.quiet {
            println!("No items with {} matching '{}'.", what, pattern);
        }
        return Ok(());
    }

    let format = resolve_format(global, &config, OutputFormat::Tsv);
    print_items(&found, format, DEFAULT_COLUMNS, !global.quiet)
}
