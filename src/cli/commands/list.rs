//! `inv list` command - sorted, filtered item listing

use clap::ValueEnum;
use miette::Result;

use crate::cli::commands::utils::print_items;
use crate::cli::helpers::{load_config, open_session, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{LocationFilter, QuerySpec, SortColumn};

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    InventoryNumber,
    Name,
    Description,
    Quantity,
    Location,
    LastUpdated,
}

impl ListColumn {
    pub fn key(&self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::InventoryNumber => "inventory-number",
            ListColumn::Name => "name",
            ListColumn::Description => "description",
            ListColumn::Quantity => "quantity",
            ListColumn::Location => "location",
            ListColumn::LastUpdated => "last-updated",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Sort by column (default: configured default_sort, else id)
    #[arg(long, short = 's')]
    pub sort: Option<SortColumn>,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Search in name, inventory number and description
    #[arg(long)]
    pub search: Option<String>,

    /// Only items at this location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::InventoryNumber,
        ListColumn::Name,
        ListColumn::Quantity,
        ListColumn::Location
    ])]
    pub columns: Vec<ListColumn>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = open_session(&config);

    let query = QuerySpec {
        sort_column: args.sort.unwrap_or_else(|| config.sort_column()),
        ascending: !args.reverse,
        text_filter: args.search.unwrap_or_default(),
        location_filter: LocationFilter::from_input(args.location.as_deref()),
    };
    let session = session.with_query(query);

    let mut items = session.view();
    let total = session.store().len();
    if let Some(limit) = args.limit {
        items.truncate(limit);
    }

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    if items.is_empty() {
        if !global.quiet {
            if total == 0 {
                println!("No items found.");
            } else {
                println!("No items match. Displaying 0 of {} items.", total);
            }
        }
        return Ok(());
    }

    let format = resolve_format(global, &config, OutputFormat::Tsv);
    let columns: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
    print_items(&items, format, &columns, !global.quiet)
}
