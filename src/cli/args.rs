//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    add::AddArgs,
    completions::CompletionsArgs,
    config::ConfigCommands,
    data::{ExportArgs, ImportArgs},
    delete::DeleteArgs,
    edit::EditArgs,
    find::FindCommands,
    labels::LabelsArgs,
    list::ListArgs,
    location::LocationCommands,
    shell::ShellArgs,
    show::ShowArgs,
};

#[derive(Parser)]
#[command(name = "inv")]
#[command(author, version, about = "Terminal inventory manager")]
#[command(long_about = "Track components, their quantities and storage locations in plain JSON files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding inventory.json and locations.json
    #[arg(long, global = true, env = "INV_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List items with sorting and filtering
    List(ListArgs),

    /// Show one item's details
    Show(ShowArgs),

    /// Add a new item
    Add(AddArgs),

    /// Edit an existing item
    Edit(EditArgs),

    /// Delete an item
    Delete(DeleteArgs),

    /// Find items by name or inventory number
    #[command(subcommand)]
    Find(FindCommands),

    /// Manage storage locations
    #[command(subcommand)]
    Location(LocationCommands),

    /// Import items from a CSV file
    Import(ImportArgs),

    /// Export all items to a CSV file
    Export(ExportArgs),

    /// Print label sheets
    Labels(LabelsArgs),

    /// Interactive session with menus
    Shell(ShellArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists, detail view for show)
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

